//! Shopify Admin REST API client.
//!
//! # Security
//!
//! The Admin API access token grants read access to orders, customers and
//! inventory, and write access to products. It is held as a `SecretString`
//! and only ever sent in the `X-Shopify-Access-Token` header.
//!
//! # Architecture
//!
//! - Plain REST resources (`orders.json`, `variants/{id}.json`, ...) via `reqwest`
//! - Direct API calls to Shopify (no local persistence)
//! - Rate limiting is surfaced as [`ShopifyError::RateLimited`], not retried
//!
//! # Example
//!
//! ```rust,ignore
//! use shipready_admin::shopify::{AdminClient, OrderQuery};
//!
//! let client = AdminClient::new(&config.shopify)?;
//!
//! let orders = client.get_orders(&OrderQuery::ready_to_ship()).await?;
//! let variant = client.get_variant(orders[0].line_items[0].variant_id.unwrap()).await?;
//! ```

mod admin;
pub mod types;

pub use admin::{AdminClient, OrderQuery};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Validation error from a write (HTTP 422).
    #[error("User error: {0}")]
    UserError(String),

    /// Any other non-success response.
    #[error("Shopify returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Upstream error text.
        message: String,
    },

    /// The configured store or base URL is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ShopifyError {
    /// Whether retrying the same call later could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
