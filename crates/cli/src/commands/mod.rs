//! Command implementations.
//!
//! Every command builds a [`Context`] from the environment: configuration,
//! the file-backed session and an API client reading the session's token.

pub mod dashboard;
pub mod orders;
pub mod products;
pub mod profile;
pub mod session;

use std::sync::Arc;

use seller_console_client::resource::Fetch;
use seller_console_client::{
    AccountStore, ApiClient, ApiError, AuthError, ClientConfig, ConfigError, FetchHandle,
    FileStore, Reloader, Resource, SessionManager, StoreError,
};
use seller_console_core::{Account, ValidationError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command needs an active account.
    #[error("not logged in; run `sc-cli login` first")]
    NotLoggedIn,

    /// A resource failed to load; details are in the log.
    #[error("{0}")]
    Fetch(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Reloader for a one-shot process: the next invocation starts from scratch
/// under the new token anyway.
struct NextCommandReload;

impl Reloader for NextCommandReload {
    fn reload(&self) {
        tracing::info!("Active account changed; the next command runs under it");
    }
}

/// Everything a command needs.
pub struct Context {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub session: SessionManager<ApiClient>,
}

impl Context {
    /// Load configuration and the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` for invalid environment values, or
    /// `CliError::Api` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let store = AccountStore::new(Arc::new(FileStore::new(config.session_file())));
        let api = ApiClient::new(&config, Arc::new(store.clone()))?;

        let mut session = SessionManager::new(store, api.clone(), Arc::new(NextCommandReload));
        session.initialize();

        Ok(Self {
            config,
            api,
            session,
        })
    }

    /// The active account, or `CliError::NotLoggedIn`.
    pub fn require_login(&self) -> Result<&Account, CliError> {
        self.session.active_account().ok_or(CliError::NotLoggedIn)
    }
}

/// Wait for a fetch and turn the resulting state into a value or error.
async fn settle<F: Fetch>(resource: &Resource<F>, handle: FetchHandle) -> Result<F::Output, CliError> {
    handle.settled().await;
    let state = resource.snapshot();
    match (state.data, state.error) {
        (_, Some(message)) => Err(CliError::Fetch(message)),
        (Some(data), None) => Ok(data),
        (None, None) => Err(CliError::Fetch(F::failure_message().to_owned())),
    }
}
