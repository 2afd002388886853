//! Auth and account-linking wire models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// Response of `POST /api/auth/login`.
///
/// The deployed backend answers with `{ "token": ... }` only; newer builds
/// add a `user` object. A missing or empty token is a failed login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

/// User object optionally embedded in a login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shop_name: String,
}

impl LoginUser {
    /// Best available display name: shop name, then user name, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [self.shop_name.as_str(), self.name.as_str()]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.email.as_str())
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: Email,
}

/// Response of `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    /// One-time password the seller must change after first login.
    pub temporary_password: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /api/auth/refresh` and `POST /api/account/switch`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// A server-side link between two seller accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_only_login_response() {
        let response: LoginResponse = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(response.token.as_deref(), Some("abc"));
        assert!(response.user.is_none());
    }

    #[test]
    fn test_login_response_without_token() {
        let response: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(response.token.is_none());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = LoginUser {
            id: UserId::new("u"),
            email: Email::parse("shop@example.com").unwrap(),
            name: String::new(),
            shop_name: String::new(),
        };
        assert_eq!(user.display_name(), "shop@example.com");

        user.name = "Anna".to_owned();
        assert_eq!(user.display_name(), "Anna");

        user.shop_name = "Anna Store".to_owned();
        assert_eq!(user.display_name(), "Anna Store");
    }
}
