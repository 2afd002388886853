//! Persisted account store.
//!
//! Session data lives in a small string key-value store, the same three keys
//! a browser dashboard would keep in local storage:
//!
//! - `accounts` - JSON array of every remembered [`Account`]
//! - `active_account_id` - id of the active account
//! - `active_token` - copy of the active account's token for the gateway
//!
//! Writes are synchronous and last-writer-wins. There is no cross-process
//! locking; one running client per state directory is assumed.
//!
//! [`Account`]: seller_console_core::Account

pub mod accounts;
pub mod file;
pub mod memory;

pub use accounts::{AccountStore, LoadedAccounts, TokenSource};
pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised when writing the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal string key-value storage.
///
/// Reads never fail: a missing or unreadable value is `None`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the change cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
