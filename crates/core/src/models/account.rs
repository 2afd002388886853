//! Locally remembered seller accounts.
//!
//! An [`Account`] is one logged-in identity: a display name, the bearer token
//! the API handed out, and whatever the client knows about the user behind
//! it. Several accounts may be remembered at once; the session layer decides
//! which one is active.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::models::auth::LoginUser;
use crate::types::{AccountId, Email, UserId};

/// Who an account belongs to.
///
/// The login endpoint may answer with a bare token and no user object. In
/// that case the client fabricates a [`Identity::Synthetic`] identity from
/// the submitted email. Display code must go through the accessors and not
/// assume server-confirmed fields exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Identity {
    /// Identity reported by the backend.
    Confirmed {
        id: UserId,
        email: Email,
        #[serde(rename = "shopName")]
        shop_name: String,
    },
    /// Identity made up client-side: a minted id and the email as the name.
    Synthetic {
        id: UserId,
        email: Email,
        #[serde(rename = "shopName")]
        shop_name: String,
    },
}

impl Identity {
    /// Fabricate an identity for a token-only login response.
    #[must_use]
    pub fn synthetic(email: Email) -> Self {
        Self::Synthetic {
            id: UserId::generate(),
            shop_name: email.as_str().to_owned(),
            email,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &UserId {
        match self {
            Self::Confirmed { id, .. } | Self::Synthetic { id, .. } => id,
        }
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        match self {
            Self::Confirmed { email, .. } | Self::Synthetic { email, .. } => email,
        }
    }

    #[must_use]
    pub fn shop_name(&self) -> &str {
        match self {
            Self::Confirmed { shop_name, .. } | Self::Synthetic { shop_name, .. } => shop_name,
        }
    }

    /// Whether the backend vouched for these fields.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// A remembered login.
///
/// The token is opaque; the client stores and forwards it but never parses
/// it. `Debug` output redacts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub shop_name: String,
    #[serde(with = "token_serde")]
    pub token: SecretString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

impl Account {
    /// Build an account from a successful login.
    ///
    /// A fresh account id is always minted. When the backend returned a user
    /// object the identity is confirmed; otherwise the submitted email doubles
    /// as the display name.
    #[must_use]
    pub fn from_login(credential: &Email, token: SecretString, user: Option<LoginUser>) -> Self {
        let identity = match user {
            Some(user) => Identity::Confirmed {
                shop_name: user.display_name().to_owned(),
                id: user.id,
                email: user.email,
            },
            None => Identity::synthetic(credential.clone()),
        };

        Self {
            id: AccountId::generate(),
            shop_name: identity.shop_name().to_owned(),
            token,
            user: Some(identity),
        }
    }

    /// Email of the identity behind this account, if known.
    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        self.user.as_ref().map(Identity::email)
    }
}

/// The persisted record keeps the raw token; `SecretString` refuses to
/// serialize on its own.
mod token_serde {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(token.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
        String::deserialize(deserializer).map(SecretString::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn email() -> Email {
        Email::parse("seller@example.com").unwrap()
    }

    #[test]
    fn test_token_only_login_fabricates_identity() {
        let account = Account::from_login(&email(), SecretString::from("tok"), None);

        let identity = account.user.as_ref().unwrap();
        assert!(!identity.is_confirmed());
        assert_eq!(identity.shop_name(), "seller@example.com");
        assert_eq!(account.shop_name, "seller@example.com");
        assert_ne!(identity.id().as_str(), account.id.as_str());
    }

    #[test]
    fn test_login_with_user_is_confirmed() {
        let user = LoginUser {
            id: UserId::new("u-1"),
            email: email(),
            name: "Anna".to_owned(),
            shop_name: "Anna's Boutique".to_owned(),
        };
        let account = Account::from_login(&email(), SecretString::from("tok"), Some(user));

        let identity = account.user.as_ref().unwrap();
        assert!(identity.is_confirmed());
        assert_eq!(identity.id().as_str(), "u-1");
        assert_eq!(account.shop_name, "Anna's Boutique");
    }

    #[test]
    fn test_persisted_shape() {
        let account = Account {
            id: AccountId::new("a-1"),
            shop_name: "Shop".to_owned(),
            token: SecretString::from("tok"),
            user: Some(Identity::Synthetic {
                id: UserId::new("u-1"),
                email: email(),
                shop_name: "Shop".to_owned(),
            }),
        };

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "a-1",
                "shopName": "Shop",
                "token": "tok",
                "user": {
                    "source": "synthetic",
                    "id": "u-1",
                    "email": "seller@example.com",
                    "shopName": "Shop"
                }
            })
        );

        let back: Account = serde_json::from_value(value).unwrap();
        assert_eq!(back.token.expose_secret(), "tok");
        assert_eq!(back.user, account.user);
    }

    #[test]
    fn test_user_is_optional_in_persisted_record() {
        let account: Account =
            serde_json::from_str(r#"{"id":"a-2","shopName":"Linked","token":"t"}"#).unwrap();
        assert!(account.user.is_none());
        assert!(account.email().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let account = Account::from_login(&email(), SecretString::from("super-secret"), None);
        assert!(!format!("{account:?}").contains("super-secret"));
    }
}
