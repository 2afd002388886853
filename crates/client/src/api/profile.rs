//! Profile, password and balance endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use seller_console_core::{Balance, BalanceChange, Profile, UpdateProfile};
use seller_console_core::types::validation::require;
use serde::Serialize;
use tracing::{info, instrument};

use crate::gateway::{ApiClient, ApiError};

#[derive(Serialize)]
struct ChangePassword<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// The logged-in seller's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.get(&["api", "profile"]).await
    }

    /// Rename the seller.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a blank name.
    #[instrument(skip(self))]
    pub async fn update_profile(&self, update: &UpdateProfile) -> Result<(), ApiError> {
        update.validate()?;
        self.send_empty(self.request(Method::PUT, &["api", "profile"]).json(update))
            .await
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if either password is blank, or
    /// `ApiError` if the backend rejects the old password.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), ApiError> {
        require("old password", old_password.expose_secret())?;
        require("new password", new_password.expose_secret())?;

        let body = ChangePassword {
            old_password: old_password.expose_secret(),
            new_password: new_password.expose_secret(),
        };
        self.send_empty(self.request(Method::POST, &["api", "password", "change"]).json(&body))
            .await?;
        info!("Password changed");
        Ok(())
    }

    /// Current balance.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn balance(&self) -> Result<Balance, ApiError> {
        self.get(&["api", "balance"]).await
    }

    /// Top up the balance.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(amount = %change.amount_kopecks))]
    pub async fn add_balance(&self, change: BalanceChange) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::POST, &["api", "balance", "add"]).json(&change))
            .await
    }

    /// Withdraw from the balance.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or funds are insufficient.
    #[instrument(skip(self), fields(amount = %change.amount_kopecks))]
    pub async fn withdraw_balance(&self, change: BalanceChange) -> Result<(), ApiError> {
        self.send_empty(
            self.request(Method::POST, &["api", "balance", "withdraw"])
                .json(&change),
        )
        .await
    }
}
