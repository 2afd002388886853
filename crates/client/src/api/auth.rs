//! Authentication endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use seller_console_core::{
    Email, LoginResponse, RegisterRequest, RegisterResponse, TokenResponse,
};
use serde::Serialize;
use tracing::instrument;

use crate::gateway::{ApiClient, ApiError};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// The backend may answer with only a token; callers must cope with a
    /// missing `user`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for rejected credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.post(&["api", "auth", "login"], &body).await
    }

    /// Register a seller. The response carries a one-time temporary password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the email is taken.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.post(&["api", "auth", "register"], request).await
    }

    /// Trade the current token for a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the current token is no longer valid.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<TokenResponse, ApiError> {
        self.send_json(self.request(Method::POST, &["api", "auth", "refresh"]))
            .await
    }
}
