//! Order status enums as reported by the Shopify REST API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order financial status.
///
/// Maps to Shopify's `financial_status` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    /// A status this build does not know about yet.
    #[serde(untagged)]
    Other(String),
}

impl FinancialStatus {
    /// The wire value, as used in query filters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::PartiallyRefunded => "partially_refunded",
            Self::Refunded => "refunded",
            Self::Voided => "voided",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for FinancialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order fulfillment status.
///
/// Shopify reports an unfulfilled order as `null`, so orders carry
/// `Option<FulfillmentStatus>` and `Unfulfilled` is only used as a filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Unfulfilled,
    Partial,
    Fulfilled,
    Restocked,
    /// A status this build does not know about yet.
    #[serde(untagged)]
    Other(String),
}

impl FulfillmentStatus {
    /// The wire value, as used in query filters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unfulfilled => "unfulfilled",
            Self::Partial => "partial",
            Self::Fulfilled => "fulfilled",
            Self::Restocked => "restocked",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle filter for order listings (`status=` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusFilter {
    Open,
    Closed,
    Cancelled,
    #[default]
    Any,
}

impl OrderStatusFilter {
    /// The wire value, as used in query filters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
            Self::Any => "any",
        }
    }
}
