//! Ready-to-ship aggregation.
//!
//! Orchestrates one request: fetch paid, unfulfilled orders, resolve stock
//! for each distinct variant, resolve titles for each distinct product, then
//! run the enrichment pass. Only the order fetch and the title fetch can fail
//! the request; per-variant failures degrade inside the resolver.

use thiserror::Error;
use tracing::{info, instrument};

use crate::shopify::{AdminClient, OrderQuery, ShopifyError};

use super::enrichment::{EnrichedOrder, distinct_product_ids, distinct_variant_ids, enrich_orders};
use super::inventory::resolve_inventory;
use super::titles::resolve_titles;

/// Stage of the pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Fetching the order batch.
    Orders,
    /// Fetching product titles.
    Titles,
}

impl Stage {
    /// Human-readable description for error responses.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Orders => "Failed to fetch orders from Shopify",
            Self::Titles => "Failed to fetch product titles from Shopify",
        }
    }
}

/// A failed aggregation, tagged with the stage that failed.
#[derive(Debug, Error)]
#[error("{}: {source}", .stage.describe())]
pub struct ReadyToShipError {
    /// Stage that failed.
    pub stage: Stage,
    /// Upstream error.
    pub source: ShopifyError,
}

impl ReadyToShipError {
    fn at(stage: Stage) -> impl Fn(ShopifyError) -> Self {
        move |source| Self { stage, source }
    }
}

/// Aggregation service for the ready-to-ship view.
#[derive(Debug, Clone)]
pub struct ReadyToShipService {
    client: AdminClient,
    concurrency: usize,
}

impl ReadyToShipService {
    /// Create a service bounded to `concurrency` in-flight inventory lookups.
    #[must_use]
    pub const fn new(client: AdminClient, concurrency: usize) -> Self {
        Self {
            client,
            concurrency,
        }
    }

    /// Build the enriched order batch.
    ///
    /// # Errors
    ///
    /// Returns `ReadyToShipError` when the order fetch or the title fetch
    /// fails.
    #[instrument(skip(self), fields(concurrency = self.concurrency))]
    pub async fn ready_to_ship(&self) -> Result<Vec<EnrichedOrder>, ReadyToShipError> {
        let orders = self
            .client
            .get_orders(&OrderQuery::ready_to_ship())
            .await
            .map_err(ReadyToShipError::at(Stage::Orders))?;

        let variant_ids = distinct_variant_ids(&orders);
        let product_ids = distinct_product_ids(&orders);

        let inventory = resolve_inventory(&self.client, &variant_ids, self.concurrency).await;
        let titles = resolve_titles(&self.client, &product_ids)
            .await
            .map_err(ReadyToShipError::at(Stage::Titles))?;

        let unresolved = inventory.values().filter(|r| !r.is_resolved()).count();
        info!(
            orders = orders.len(),
            variants = variant_ids.len(),
            products = product_ids.len(),
            unresolved,
            "Aggregated ready-to-ship batch"
        );

        Ok(enrich_orders(orders, &inventory, &titles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_stage() {
        let err = ReadyToShipError::at(Stage::Orders)(ShopifyError::RateLimited(2));
        assert_eq!(
            err.to_string(),
            "Failed to fetch orders from Shopify: Rate limited, retry after 2 seconds"
        );
        assert_eq!(err.stage, Stage::Orders);
    }
}
