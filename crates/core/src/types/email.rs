//! Seller login email.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Reasons a seller email is rejected before it reaches the auth endpoint.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming surrounding whitespace.
    #[error("email cannot be empty")]
    Empty,
    /// Longer than the RFC 5321 path limit.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// No `@`, or more than one.
    #[error("email must contain exactly one @ symbol")]
    BadSeparator,
    /// Nothing before the `@`.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// Nothing after the `@`.
    #[error("email domain cannot be empty")]
    EmptyDomain,
    /// Spaces or control characters inside the address.
    #[error("email cannot contain whitespace")]
    Whitespace,
}

/// An email address used as the seller's login credential.
///
/// Parsing trims surrounding whitespace and performs structural checks only;
/// the marketplace backend is the authority on whether the mailbox exists.
/// Comparison is exact, which is also how the session layer decides whether
/// two logins belong to the same account.
///
/// ```
/// use seller_console_core::Email;
///
/// let email = Email::parse("  shop@example.com ").unwrap();
/// assert_eq!(email.as_str(), "shop@example.com");
/// assert_eq!(email.domain(), "example.com");
///
/// assert!(Email::parse("shop").is_err());
/// assert!(Email::parse("a@b@c").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and trim an `Email`.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first structural problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();

        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::BadSeparator)?;
        if domain.contains('@') {
            return Err(EmailError::BadSeparator);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_shapes() {
        for input in [
            "seller@example.com",
            "first.last+shop@mail.example.co.uk",
            "a@b.c",
        ] {
            assert!(Email::parse(input).is_ok(), "{input} should parse");
        }
    }

    #[test]
    fn test_parse_trims() {
        let email = Email::parse("\tseller@example.com \n").unwrap();
        assert_eq!(email.as_str(), "seller@example.com");
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("seller"), Err(EmailError::BadSeparator));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::BadSeparator));
        assert_eq!(Email::parse("@shop.com"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("seller@"), Err(EmailError::EmptyDomain));
        assert_eq!(
            Email::parse("sel ler@shop.com"),
            Err(EmailError::Whitespace)
        );

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_domain() {
        let email: Email = "seller@shop.example".parse().unwrap();
        assert_eq!(email.domain(), "shop.example");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("seller@example.com").unwrap();
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"seller@example.com\""
        );
    }
}
