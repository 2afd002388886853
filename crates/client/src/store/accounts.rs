//! Typed view of the persisted session keys.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use seller_console_core::{Account, AccountId};
use tracing::{info, warn};

use super::{KeyValueStore, StoreError};

/// Serialized list of every remembered account.
pub const ACCOUNTS_KEY: &str = "accounts";
/// Id of the active account.
pub const ACTIVE_ACCOUNT_KEY: &str = "active_account_id";
/// Fast-access copy of the active account's token.
pub const ACTIVE_TOKEN_KEY: &str = "active_token";

/// Read-only access to the active bearer token.
///
/// This is all the API gateway gets to see of the store.
pub trait TokenSource: Send + Sync {
    /// Token to attach to the next request, if anyone is logged in.
    fn active_token(&self) -> Option<SecretString>;
}

/// Result of reading the persisted record at startup.
#[derive(Debug, Default)]
pub struct LoadedAccounts {
    pub accounts: Vec<Account>,
    pub active_id: Option<AccountId>,
}

/// Persisted account record on top of a [`KeyValueStore`].
///
/// Only the session manager should hold one of these with write intent;
/// everyone else goes through [`TokenSource`].
#[derive(Clone)]
pub struct AccountStore {
    kv: Arc<dyn KeyValueStore>,
}

impl AccountStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Read the account list and active pointer.
    ///
    /// Never fails. An unparseable account list is storage corruption: all
    /// three keys are purged and an empty record is returned.
    #[must_use]
    pub fn load(&self) -> LoadedAccounts {
        let Some(raw) = self.kv.get(ACCOUNTS_KEY) else {
            return LoadedAccounts::default();
        };

        match serde_json::from_str::<Vec<Account>>(&raw) {
            Ok(accounts) => LoadedAccounts {
                accounts,
                active_id: self.kv.get(ACTIVE_ACCOUNT_KEY).map(AccountId::from),
            },
            Err(e) => {
                warn!(error = %e, "Persisted accounts are corrupt, wiping session storage");
                if let Err(e) = self.clear_all() {
                    warn!(error = %e, "Failed to wipe corrupt session storage");
                }
                LoadedAccounts::default()
            }
        }
    }

    /// Replace the stored account list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the list cannot be encoded or written.
    pub fn save(&self, accounts: &[Account]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(accounts)?;
        self.kv.set(ACCOUNTS_KEY, &raw)
    }

    /// Point the active slot (id and fast-access token) at an account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if either key cannot be written.
    pub fn set_active(&self, account_id: &AccountId, token: &SecretString) -> Result<(), StoreError> {
        self.kv.set(ACTIVE_ACCOUNT_KEY, account_id.as_str())?;
        self.kv.set(ACTIVE_TOKEN_KEY, token.expose_secret())
    }

    /// Forget the active account, keeping the account list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a key cannot be removed.
    pub fn clear_active(&self) -> Result<(), StoreError> {
        self.kv.remove(ACTIVE_ACCOUNT_KEY)?;
        self.kv.remove(ACTIVE_TOKEN_KEY)
    }

    /// Remove every session key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a key cannot be removed.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.kv.remove(ACCOUNTS_KEY)?;
        self.clear_active()?;
        info!("Session storage cleared");
        Ok(())
    }

    /// Persisted active account id.
    #[must_use]
    pub fn active_id(&self) -> Option<AccountId> {
        self.kv.get(ACTIVE_ACCOUNT_KEY).map(AccountId::from)
    }
}

impl TokenSource for AccountStore {
    fn active_token(&self) -> Option<SecretString> {
        self.kv
            .get(ACTIVE_TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore").finish_non_exhaustive()
    }
}
