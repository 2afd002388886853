//! Seller profile and balance models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, Kopecks, UserId, ValidationError};
use crate::types::validation::require;

/// Response of `GET /api/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub balance_kopecks: Kopecks,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
}

impl UpdateProfile {
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] for a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

/// Response of `GET /api/balance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub balance_kopecks: Kopecks,
}

/// Body of `POST /api/balance/add` and `POST /api/balance/withdraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub amount_kopecks: Kopecks,
}

impl BalanceChange {
    /// Build a change request, rejecting zero and negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveAmount`].
    pub const fn new(amount: Kopecks) -> Result<Self, ValidationError> {
        if amount.get() <= 0 {
            return Err(ValidationError::NonPositiveAmount("amount"));
        }
        Ok(Self {
            amount_kopecks: amount,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_without_balance() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "name": "Anna",
            "email": "anna@example.com",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(profile.balance_kopecks, Kopecks::ZERO);
    }

    #[test]
    fn test_balance_change_rejects_non_positive() {
        assert!(BalanceChange::new(Kopecks::new(100)).is_ok());
        assert_eq!(
            BalanceChange::new(Kopecks::new(0)),
            Err(ValidationError::NonPositiveAmount("amount"))
        );
    }
}
