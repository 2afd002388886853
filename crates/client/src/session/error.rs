//! Session error types.

use thiserror::Error;

use seller_console_core::ValidationError;

use crate::gateway::ApiError;
use crate::store::StoreError;

/// Errors that can occur while logging in or registering.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend refused the credentials.
    #[error("login rejected: {0}")]
    Rejected(String),

    /// The backend answered success without a usable token.
    #[error("no token in login response")]
    MissingToken,

    /// Input failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport or protocol failure talking to the auth endpoint.
    #[error("auth request failed: {0}")]
    Api(ApiError),

    /// The new session could not be persisted.
    #[error("failed to persist session: {0}")]
    Storage(#[from] StoreError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(message) => Self::Rejected(message),
            ApiError::Validation(err) => Self::Validation(err),
            other => Self::Api(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_becomes_rejected() {
        let err = AuthError::from(ApiError::Unauthorized("invalid email or password".to_owned()));
        assert!(matches!(err, AuthError::Rejected(ref m) if m == "invalid email or password"));
    }

    #[test]
    fn test_other_api_errors_pass_through() {
        let err = AuthError::from(ApiError::RateLimited(30));
        assert!(matches!(err, AuthError::Api(ApiError::RateLimited(30))));
    }
}
