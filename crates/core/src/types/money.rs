//! Account balance amounts.
//!
//! The marketplace keeps seller balances as integer kopecks to avoid float
//! rounding. Catalog and order prices arrive as JSON numbers and are held as
//! [`rust_decimal::Decimal`] on the models themselves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in kopecks (1/100 of a rouble).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kopecks(i64);

impl Kopecks {
    /// Zero balance.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw kopeck amount.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Raw kopeck amount.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Amount in roubles as an exact decimal.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Convert a rouble amount, rounding to the nearest kopeck.
    ///
    /// Returns `None` when the value does not fit.
    #[must_use]
    pub fn from_decimal(roubles: Decimal) -> Option<Self> {
        use rust_decimal::RoundingStrategy;
        use rust_decimal::prelude::ToPrimitive;

        roubles
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Self)
    }
}

impl std::fmt::Display for Kopecks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} ₽", self.to_decimal())
    }
}
