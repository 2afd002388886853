//! API gateway: the single HTTP client every endpoint goes through.
//!
//! # Authentication
//!
//! Requests are built by [`ApiClient`] only. At build time it asks its
//! [`TokenSource`](crate::store::TokenSource) for the active token and, when
//! there is one, attaches it as a bearer credential. Without a token the
//! request goes out unauthenticated and the server decides. Nothing else in
//! the crate reads or forwards the token.

pub mod client;

pub use client::ApiClient;

use seller_console_core::ValidationError;
use thiserror::Error;

/// Errors that can occur when talking to the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No token, or the server rejected it.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Server-provided error text, or the status reason.
        message: String,
    },

    /// Configured base URL cannot carry paths.
    #[error("Invalid API base URL: {0}")]
    BaseUrl(String),

    /// Input rejected before sending.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Superseded by a newer request. Never shown to the user.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Whether this is a cancellation rather than a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("order o-1".to_string());
        assert_eq!(err.to_string(), "Not found: order o-1");

        let err = ApiError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "invalid input".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 400 Bad Request: invalid input");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_cancelled_is_flagged() {
        assert!(ApiError::Cancelled.is_cancelled());
        assert!(!ApiError::RateLimited(1).is_cancelled());
    }
}
