//! Order listing for the Admin REST API.

use serde::Serialize;
use tracing::instrument;

use shipready_core::{FinancialStatus, FulfillmentStatus, OrderStatusFilter};

use super::{AdminClient, MAX_PAGE_SIZE};
use crate::shopify::{
    ShopifyError,
    types::{Order, OrdersEnvelope},
};

/// Filters for `orders.json`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderQuery {
    /// Order lifecycle filter.
    pub status: OrderStatusFilter,
    /// Payment state filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_status: Option<FinancialStatus>,
    /// Fulfillment state filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_status: Option<FulfillmentStatus>,
    /// Page size (clamped to 250 by the client).
    pub limit: usize,
}

impl OrderQuery {
    /// Orders that are paid but not yet shipped, in any lifecycle state.
    #[must_use]
    pub const fn ready_to_ship() -> Self {
        Self {
            status: OrderStatusFilter::Any,
            financial_status: Some(FinancialStatus::Paid),
            fulfillment_status: Some(FulfillmentStatus::Unfulfilled),
            limit: MAX_PAGE_SIZE,
        }
    }
}

impl AdminClient {
    /// List orders matching `query` (first page only).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(status = %query.status.as_str()))]
    pub async fn get_orders(&self, query: &OrderQuery) -> Result<Vec<Order>, ShopifyError> {
        let mut query = query.clone();
        query.limit = query.limit.clamp(1, MAX_PAGE_SIZE);

        let envelope: OrdersEnvelope = self.get_json("orders.json", &query).await?;

        tracing::debug!(count = envelope.orders.len(), "Fetched orders");
        Ok(envelope.orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_to_ship_query_params() {
        let params = serde_json::to_value(OrderQuery::ready_to_ship()).unwrap_or_default();
        assert_eq!(params["status"], "any");
        assert_eq!(params["financial_status"], "paid");
        assert_eq!(params["fulfillment_status"], "unfulfilled");
        assert_eq!(params["limit"], 250);
    }

    #[test]
    fn test_unset_filters_are_omitted() {
        let query = OrderQuery {
            status: OrderStatusFilter::Open,
            financial_status: None,
            fulfillment_status: None,
            limit: 50,
        };
        let params = serde_json::to_value(query).unwrap_or_default();
        assert!(params.get("financial_status").is_none());
        assert!(params.get("fulfillment_status").is_none());
    }
}
