//! Seller Console Core - Shared types library.
//!
//! This crate provides the types used across all Seller Console components:
//! - `client` - Session management, API gateway and data-fetch resources
//! - `cli` - Command-line front end for sellers
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, money and statuses
//! - [`models`] - Wire and domain models (accounts, orders, products, dashboard)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
