use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::store::SessionStore;
use crate::models::{UserProfile, UserRole};

/// Storage keys. The names match what the web client keeps in browser
/// storage so both can share a backend session layout.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_KEY: &str = "user";
pub const IS_LOGGED_IN_KEY: &str = "isLoggedIn";
pub const USER_ROLES_KEY: &str = "userRoles";
pub const USER_EMAIL_KEY: &str = "userEmail";

const ALL_KEYS: [&str; 5] = [
    ACCESS_TOKEN_KEY,
    USER_KEY,
    IS_LOGGED_IN_KEY,
    USER_ROLES_KEY,
    USER_EMAIL_KEY,
];

/// Owner of all persisted session state: the access token, the signed-in
/// user's profile and the quick-read flags derived from it.
///
/// Clone is cheap and clones share the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.access_token().is_some())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The current bearer token, if any.
    ///
    /// Store read errors are logged and treated as "no token" so a broken
    /// store degrades to an unauthenticated request instead of no request.
    pub fn access_token(&self) -> Option<String> {
        match self.store.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read access token");
                None
            }
        }
    }

    pub fn set_access_token(&self, token: &str) -> Result<()> {
        self.store
            .set(ACCESS_TOKEN_KEY, token)
            .context("Failed to persist access token")
    }

    /// Record a successful login: the profile plus the derived flags.
    pub fn login_successful(&self, user: &UserProfile) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &user_json)?;
        self.store.set(IS_LOGGED_IN_KEY, "true")?;

        if !user.user_roles.is_empty() {
            let roles = serde_json::to_string(&user.user_roles)?;
            self.store.set(USER_ROLES_KEY, &roles)?;
        }
        if let Some(ref email) = user.email {
            self.store.set(USER_EMAIL_KEY, email)?;
        }
        debug!(roles = user.user_roles.len(), "Stored user profile");
        Ok(())
    }

    fn user_json(&self) -> Option<String> {
        self.store.get(USER_KEY).ok().flatten()
    }

    /// The stored profile. `None` when absent or not valid JSON.
    pub fn current_user(&self) -> Option<UserProfile> {
        let json = self.user_json()?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user profile is not valid JSON");
                None
            }
        }
    }

    /// Role names of the stored user; empty when unknown.
    pub fn user_roles(&self) -> Vec<String> {
        if let Some(user) = self.current_user() {
            return user.role_names();
        }
        // Fall back to the standalone roles entry
        self.store
            .get(USER_ROLES_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str::<Vec<UserRole>>(&json).ok())
            .map(|roles| roles.into_iter().map(|r| r.role_name).collect())
            .unwrap_or_default()
    }

    pub fn user_email(&self) -> Option<String> {
        self.current_user()
            .and_then(|u| u.email)
            .or_else(|| self.store.get(USER_EMAIL_KEY).ok().flatten())
    }

    /// True once a user profile has been stored.
    pub fn is_logged_in(&self) -> bool {
        self.user_json().is_some()
    }

    /// Remove every session key. Individual failures are logged and the
    /// remaining keys are still removed.
    pub fn clear(&self) {
        for key in ALL_KEYS {
            if let Err(e) = self.store.remove(key) {
                warn!(key, error = %e, "Failed to remove session key");
            }
        }
        debug!("Session cleared");
    }
}
