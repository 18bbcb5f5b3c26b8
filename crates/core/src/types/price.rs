//! Monetary amounts as returned by the Shopify REST API.
//!
//! Shopify encodes prices as decimal strings (`"19.99"`). `Money` keeps them
//! as `Decimal` so totals never pass through floating point.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a money amount.
#[derive(Debug, Error)]
#[error("invalid money amount: {0}")]
pub struct MoneyError(String);

/// A currency-less decimal amount (e.g. an order's `total_price`).
///
/// Serializes as a string to match the upstream wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format with a display prefix, e.g. `"Rs 19.99"`.
    #[must_use]
    pub fn display_with(&self, prefix: &str) -> String {
        if prefix.is_empty() {
            self.to_string()
        } else {
            format!("{prefix} {self}")
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| MoneyError(s.to_string()))
    }
}
