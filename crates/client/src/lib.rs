//! Seller Console client library.
//!
//! Everything a front end needs to talk to the marketplace seller API:
//!
//! - [`store`] - persisted account record (key-value store backed)
//! - [`session`] - multi-account session manager
//! - [`gateway`] - HTTP client that attaches the active bearer token
//! - [`api`] - typed endpoint bindings on [`ApiClient`]
//! - [`resource`] - request state containers with cancellation and caching
//! - [`config`] - environment-driven configuration
//!
//! # Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use seller_console_client::{
//!     AccountStore, ApiClient, ClientConfig, FileStore, NoReload, SessionManager,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let store = AccountStore::new(Arc::new(FileStore::new(config.session_file())));
//! let api = ApiClient::new(&config, Arc::new(store.clone()))?;
//!
//! let mut session = SessionManager::new(store, api.clone(), Arc::new(NoReload));
//! session.initialize();
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod gateway;
pub mod resource;
pub mod session;
pub mod store;

pub use config::{ClientConfig, ConfigError};
pub use gateway::{ApiClient, ApiError};
pub use resource::{FetchHandle, Resource, ResourceState, ResponseCache};
pub use session::{AuthError, Authenticator, NoReload, ReloadSignal, Reloader, SessionManager, SessionStatus};
pub use store::{AccountStore, FileStore, KeyValueStore, MemoryStore, StoreError, TokenSource};
