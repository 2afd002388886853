//! Domain and wire models.
//!
//! Response models are lenient: every field the dashboard can live without
//! carries `#[serde(default)]`, because the marketplace backend omits
//! fields it has no data for.

pub mod account;
pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod order;
pub mod pagination;
pub mod product;
pub mod profile;

pub use account::{Account, Identity};
pub use analytics::*;
pub use auth::*;
pub use dashboard::*;
pub use order::*;
pub use pagination::Pagination;
pub use product::*;
pub use profile::*;
