//! Server-side account linking.
//!
//! Distinct from the client-side account list kept by the session manager:
//! these accounts are linked on the backend and switching returns a token
//! minted for the target user.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use seller_console_core::{Email, LinkedAccount, TokenResponse, UserId};
use serde::Serialize;
use tracing::instrument;

use crate::gateway::{ApiClient, ApiError};

#[derive(Serialize)]
struct LinkRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SwitchRequest<'a> {
    target_user_id: &'a str,
}

impl ApiClient {
    /// Accounts linked to the current user on the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn linked_accounts(&self) -> Result<Vec<LinkedAccount>, ApiError> {
        self.get(&["api", "account", "links"]).await
    }

    /// Link another seller account by its credentials.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for wrong credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn link_account(&self, email: &Email, password: &SecretString) -> Result<(), ApiError> {
        let body = LinkRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.send_empty(self.request(Method::POST, &["api", "account", "link"]).json(&body))
            .await
    }

    /// Obtain a token for a linked account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the target is not linked.
    #[instrument(skip(self))]
    pub async fn switch_linked_account(&self, target: &UserId) -> Result<TokenResponse, ApiError> {
        self.post(
            &["api", "account", "switch"],
            &SwitchRequest {
                target_user_id: target.as_str(),
            },
        )
        .await
    }
}
