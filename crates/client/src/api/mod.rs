//! Typed bindings for the seller REST API.
//!
//! Each submodule adds methods to [`ApiClient`](crate::gateway::ApiClient)
//! for one area of the API. Bindings are thin: they pick the path, shape the
//! body and decode the response. Authentication is handled by the gateway.

mod accounts;
mod analytics;
mod auth;
mod dashboard;
mod orders;
mod products;
mod profile;

pub use products::{ExportFormat, ImageUpload};
