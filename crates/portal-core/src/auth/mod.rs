//! Authentication module for managing the client-side session.
//!
//! This module provides:
//! - `Session`: owner of the access token and the signed-in user's profile
//! - `SessionStore`: the key-value backend a session persists to, with
//!   `MemoryStore`, `FileStore` (`session.json` in the cache directory)
//!   and `KeyringStore` (OS keychain) implementations

pub mod credentials;
pub mod session;
pub mod store;

use std::sync::Arc;

use anyhow::Result;

pub use credentials::KeyringStore;
pub use session::Session;
pub use store::{FileStore, MemoryStore, SessionStore};

use crate::config::{Config, StorageKind};

/// Open the session store selected in the configuration.
pub fn open_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.storage {
        StorageKind::File => Arc::new(FileStore::open(&config.cache_dir()?)?),
        StorageKind::Keyring => Arc::new(KeyringStore::new()),
        StorageKind::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
