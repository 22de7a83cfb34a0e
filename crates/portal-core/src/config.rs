//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the backend URL, auth endpoint paths, the session storage
//! strategy and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/campus-portal/config.json`.
//! The backend URL can be overridden from the environment, see
//! [`Config::base_url`].

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "campus-portal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variables consulted for the backend URL, highest priority first.
pub const BACKEND_URL_ENV_VARS: [&str; 3] = [
    "PORTAL_BACKEND_URL",
    "NEXT_PUBLIC_BACKEND_URL",
    "NEXT_PUBLIC_API_BASE_URL",
];

const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";
const DEFAULT_LOGOUT_PATH: &str = "/auth/logout";
const DEFAULT_LOGIN_PATH: &str = "/oauth2/authorization/google";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where the session (token, user profile) is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// `session.json` in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Process memory only; nothing survives exit
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub refresh_path: String,
    pub logout_path: String,
    pub login_path: String,
    pub request_timeout_secs: u64,
    pub storage: StorageKind,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            logout_path: DEFAULT_LOGOUT_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage: StorageKind::default(),
            last_email: None,
        }
    }
}

impl Config {
    /// Configuration pointing at a given backend, everything else default.
    pub fn with_backend(url: impl Into<String>) -> Self {
        Self {
            backend_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Resolve the backend base URL.
    ///
    /// The environment wins over the config file, in the order of
    /// [`BACKEND_URL_ENV_VARS`]. A trailing `/` is stripped so paths can be
    /// appended directly.
    pub fn base_url(&self) -> Result<String> {
        let from_env = BACKEND_URL_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        self.resolve_base_url(from_env)
    }

    fn resolve_base_url(&self, from_env: Option<String>) -> Result<String> {
        let url = from_env
            .or_else(|| self.backend_url.clone())
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No backend URL configured (set {} or backend_url in {})",
                    BACKEND_URL_ENV_VARS[0],
                    CONFIG_FILE
                )
            })?;
        Ok(url.trim().trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.refresh_path, "/auth/refresh");
        assert_eq!(config.logout_path, "/auth/logout");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.storage, StorageKind::File);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"backend_url": "https://api.example.edu", "storage": "keyring"}"#)
                .unwrap();
        assert_eq!(config.backend_url.as_deref(), Some("https://api.example.edu"));
        assert_eq!(config.storage, StorageKind::Keyring);
        assert_eq!(config.login_path, "/oauth2/authorization/google");
    }

    #[test]
    fn test_resolve_base_url() {
        let config = Config::with_backend("https://file.example.edu/");
        assert_eq!(config.resolve_base_url(None).unwrap(), "https://file.example.edu");
        assert_eq!(
            config
                .resolve_base_url(Some("http://env.example.edu//".to_string()))
                .unwrap(),
            "http://env.example.edu"
        );

        let empty = Config::default();
        assert!(empty.resolve_base_url(None).is_err());
    }
}
