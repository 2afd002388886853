//! Multi-account session management.
//!
//! [`SessionManager`] is the only component allowed to change who is logged
//! in. It owns the in-memory account list and the active pointer, and
//! mirrors every change into the [`AccountStore`] so the gateway picks up
//! the right token on the next request.

mod error;
mod reload;

pub use error::AuthError;
pub use reload::{NoReload, Reloader, ReloadSignal};

use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use seller_console_core::types::validation::require;
use seller_console_core::{
    Account, AccountId, Email, LoginResponse, RegisterRequest, RegisterResponse, ValidationError,
};
use tracing::{debug, info, instrument, warn};

use crate::gateway::{ApiClient, ApiError};
use crate::store::{AccountStore, StoreError, TokenSource};

/// The auth endpoints the session manager depends on.
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for a token.
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Create a seller account.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<RegisterResponse, ApiError>> + Send;
}

impl Authenticator for ApiClient {
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send {
        Self::login(self, email, password)
    }

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<RegisterResponse, ApiError>> + Send {
        Self::register(self, request)
    }
}

/// Where the session currently stands.
#[derive(Debug, Clone, Copy)]
pub enum SessionStatus<'a> {
    /// Persisted state has not been read yet.
    Uninitialized,
    /// Initialized with no active account.
    LoggedOut,
    /// Initialized with an active account.
    LoggedIn(&'a Account),
}

/// Owns the set of remembered accounts and which one is active.
///
/// Create one per process, call [`initialize`](Self::initialize) once, and
/// pass it to whatever needs to gate on login state.
pub struct SessionManager<A> {
    store: AccountStore,
    auth: A,
    reloader: Arc<dyn Reloader>,
    accounts: Vec<Account>,
    active: Option<AccountId>,
    initialized: bool,
}

impl<A: Authenticator> SessionManager<A> {
    #[must_use]
    pub fn new(store: AccountStore, auth: A, reloader: Arc<dyn Reloader>) -> Self {
        Self {
            store,
            auth,
            reloader,
            accounts: Vec::new(),
            active: None,
            initialized: false,
        }
    }

    /// Load persisted accounts and restore the active one.
    ///
    /// Never fails: corrupt storage is wiped by the store and the session
    /// starts empty. An active pointer naming no loaded account is cleared
    /// along with its token. Calling it again is a no-op.
    ///
    /// Every mutating operation calls this first, so the persisted list is
    /// always read before it is rewritten.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        let loaded = self.store.load();
        let had_pointer = loaded.active_id.is_some() || self.store.active_token().is_some();
        self.accounts = loaded.accounts;
        self.active = loaded
            .active_id
            .filter(|id| self.accounts.iter().any(|a| &a.id == id));

        if let Some(account) = self.active_account() {
            if let Err(e) = self.store.set_active(&account.id, &account.token) {
                warn!(error = %e, "Failed to restore active token");
            }
        } else if had_pointer
            && let Err(e) = self.store.clear_active()
        {
            warn!(error = %e, "Failed to clear stale active token");
        }

        self.initialized = true;
        info!(
            accounts = self.accounts.len(),
            active = ?self.active,
            "Session initialized"
        );
    }

    /// Drop in-memory state without touching storage.
    ///
    /// The manager returns to its uninitialized state; the next
    /// [`initialize`](Self::initialize) reads storage again.
    pub fn teardown(&mut self) {
        self.accounts.clear();
        self.active = None;
        self.initialized = false;
        debug!("Session torn down");
    }

    /// Log in and make the resulting account active.
    ///
    /// A remembered account with the same email is replaced in place;
    /// otherwise the account is appended. The full list is persisted before
    /// memory is updated.
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation` for a malformed email or blank password
    /// - `AuthError::Rejected` if the backend refuses the credentials
    /// - `AuthError::MissingToken` if the response has no token
    /// - `AuthError::Storage` if the session cannot be persisted
    #[instrument(skip(self, password))]
    pub async fn login(
        &mut self,
        email: &str,
        password: SecretString,
    ) -> Result<Account, AuthError> {
        self.initialize();
        let email = Email::parse(email).map_err(ValidationError::from)?;
        require("password", password.expose_secret())?;

        let response = self.auth.login(&email, &password).await?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let account = Account::from_login(&email, SecretString::from(token), response.user);

        let mut accounts = self.accounts.clone();
        let existing = accounts.iter_mut().find(|a| a.email() == Some(&email));
        let replaced = existing.is_some();
        match existing {
            Some(slot) => *slot = account.clone(),
            None => accounts.push(account.clone()),
        }

        self.store.save(&accounts)?;
        self.store.set_active(&account.id, &account.token)?;

        self.accounts = accounts;
        self.active = Some(account.id.clone());
        info!(account_id = %account.id, replaced, "Logged in");

        Ok(account)
    }

    /// Forget the active account but keep it for quick re-switching.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the active pointer cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.initialize();
        self.store.clear_active()?;
        self.active = None;
        info!("Logged out");
        Ok(())
    }

    /// Forget every account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage cannot be cleared.
    #[instrument(skip(self))]
    pub fn logout_all(&mut self) -> Result<(), StoreError> {
        self.initialize();
        self.store.clear_all()?;
        self.accounts.clear();
        self.active = None;
        info!("Logged out of all accounts");
        Ok(())
    }

    /// Make a remembered account active and request a full reload.
    ///
    /// An unknown id changes nothing. Returns whether a switch happened.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the new active pointer cannot be written.
    #[instrument(skip(self))]
    pub fn switch_account(&mut self, account_id: &AccountId) -> Result<bool, StoreError> {
        self.initialize();
        let Some(account) = self.accounts.iter().find(|a| &a.id == account_id) else {
            debug!(account_id = %account_id, "Switch to unknown account ignored");
            return Ok(false);
        };

        self.store.set_active(&account.id, &account.token)?;
        self.active = Some(account.id.clone());
        info!(account_id = %account_id, "Switched account");

        self.reloader.reload();
        Ok(true)
    }

    /// Remember an account without making it active.
    ///
    /// An account whose id is already present is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the account list cannot be persisted.
    #[instrument(skip(self, account), fields(account_id = %account.id))]
    pub fn add_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.initialize();
        if self.accounts.iter().any(|a| a.id == account.id) {
            debug!("Account already present");
            return Ok(());
        }

        let mut accounts = self.accounts.clone();
        accounts.push(account);
        self.store.save(&accounts)?;
        self.accounts = accounts;
        Ok(())
    }

    /// Register a new seller. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a blank name or malformed email,
    /// or `AuthError::Api` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn register(&self, name: &str, email: &str) -> Result<RegisterResponse, AuthError> {
        require("name", name)?;
        let request = RegisterRequest {
            name: name.trim().to_owned(),
            email: Email::parse(email).map_err(ValidationError::from)?,
        };

        let response = self.auth.register(&request).await?;
        info!(email = %request.email, "Seller registered");
        Ok(response)
    }

    /// Every remembered account, in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    #[must_use]
    pub fn active_account(&self) -> Option<&Account> {
        let id = self.active.as_ref()?;
        self.accounts.iter().find(|a| &a.id == id)
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus<'_> {
        if !self.initialized {
            return SessionStatus::Uninitialized;
        }
        self.active_account()
            .map_or(SessionStatus::LoggedOut, SessionStatus::LoggedIn)
    }
}

impl<A> std::fmt::Debug for SessionManager<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("accounts", &self.accounts.len())
            .field("active", &self.active)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
