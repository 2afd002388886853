//! Client-side input validation.

use thiserror::Error;

use super::EmailError;

/// Input rejected before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// The email field is malformed.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// A money amount must be strictly positive.
    #[error("{0} must be greater than zero")]
    NonPositiveAmount(&'static str),
}

/// Reject blank (empty or whitespace-only) values.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] naming `field`.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("name", "Shop").is_ok());
        assert_eq!(
            require("password", "  "),
            Err(ValidationError::Required("password"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ValidationError::Required("password").to_string(),
            "password is required"
        );
        assert_eq!(
            ValidationError::Email(EmailError::Empty).to_string(),
            "invalid email: email cannot be empty"
        );
    }
}
