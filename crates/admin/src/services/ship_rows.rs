//! Ready-to-ship table rows.
//!
//! Flattens enriched orders into one row per line item and collapses
//! oversold variants to the order that should ship first.
//!
//! A line item is *oversold* when, after substituting the batch-wide maximum
//! on-hand figure, its committed quantity equals on-hand and available stock
//! is negative. For each oversold variant only the earliest-dated order is
//! kept. Line items that are not oversold always pass through.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use shipready_core::{OrderId, VariantId};

use super::enrichment::{EnrichedLineItem, EnrichedOrder};

const NO_CUSTOMER: &str = "No Customer";
const UNFULFILLED: &str = "Unfulfilled";

/// One row of the ready-to-ship table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipRow {
    /// Order ID.
    pub order_id: OrderId,
    /// Display number (e.g., `#1001`).
    pub order_number: String,
    /// When the order was placed.
    pub order_date: DateTime<FixedOffset>,
    /// Customer display name.
    pub customer: String,
    /// Order total with currency prefix.
    pub total: String,
    /// Payment state.
    pub financial_status: String,
    /// Fulfillment state.
    pub fulfillment_status: String,
    /// Product title, if known.
    pub product_title: Option<String>,
    /// Variant ID.
    pub variant_id: Option<VariantId>,
    /// Quantity reserved by this line item.
    pub committed_stock: i64,
    /// Stock available across locations.
    pub available_stock: i64,
    /// Batch-wide maximum on-hand for the variant.
    pub on_hand_stock: i64,
    /// Committed quantity label (e.g., `3 items`).
    pub committed_label: String,
    /// Inventory label (e.g., `8 in Stock`).
    pub inventory_label: String,
}

/// A line item paired with its order, on-hand already substituted.
#[derive(Clone, Copy)]
struct Candidate<'a> {
    order: &'a EnrichedOrder,
    item: &'a EnrichedLineItem,
    on_hand: i64,
}

impl Candidate<'_> {
    const fn is_oversold(&self) -> bool {
        self.item.committed_stock == self.on_hand && self.item.available_stock < 0
    }
}

/// Build table rows from an enriched batch.
///
/// Output order: one row per oversold variant (in the order the variant was
/// first seen oversold), then every other line item in batch order.
#[must_use]
pub fn select_rows(orders: &[EnrichedOrder], currency: &str) -> Vec<ShipRow> {
    let mut winners: Vec<Candidate<'_>> = Vec::new();
    let mut winner_index: HashMap<VariantId, usize> = HashMap::new();
    let mut passthrough: Vec<Candidate<'_>> = Vec::new();

    for order in orders {
        for item in &order.line_items {
            let on_hand = item
                .variant_id
                .and_then(|v| order.max_on_hand.get(&v).copied())
                .unwrap_or(0);
            let candidate = Candidate {
                order,
                item,
                on_hand,
            };

            match item.variant_id {
                Some(variant_id) if candidate.is_oversold() => {
                    match winner_index.get(&variant_id) {
                        Some(&idx) => {
                            if let Some(current) = winners.get_mut(idx)
                                && order.order_date < current.order.order_date
                            {
                                *current = candidate;
                            }
                        }
                        None => {
                            winner_index.insert(variant_id, winners.len());
                            winners.push(candidate);
                        }
                    }
                }
                _ => passthrough.push(candidate),
            }
        }
    }

    winners
        .into_iter()
        .chain(passthrough)
        .map(|candidate| to_row(candidate, currency))
        .collect()
}

fn to_row(candidate: Candidate<'_>, currency: &str) -> ShipRow {
    let Candidate {
        order,
        item,
        on_hand,
    } = candidate;

    ShipRow {
        order_id: order.order_id,
        order_number: order.order_number.clone(),
        order_date: order.order_date,
        customer: order
            .customer
            .as_ref()
            .and_then(crate::shopify::Customer::full_name)
            .unwrap_or_else(|| NO_CUSTOMER.to_string()),
        total: order.total_price.display_with(currency),
        financial_status: order.financial_status.to_string(),
        fulfillment_status: order
            .fulfillment_status
            .as_ref()
            .map_or_else(|| UNFULFILLED.to_string(), ToString::to_string),
        product_title: item.product_title.clone(),
        variant_id: item.variant_id,
        committed_stock: item.committed_stock,
        available_stock: item.available_stock,
        on_hand_stock: on_hand,
        committed_label: format!("{} items", item.committed_stock),
        inventory_label: format!("{on_hand} in Stock"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shipready_core::InventoryItemId;

    use super::*;
    use crate::services::enrichment::tests::{line_item, order};
    use crate::services::enrichment::{TitleMap, enrich_orders};
    use crate::services::inventory::{InventoryMap, InventoryResolution};
    use crate::shopify::Customer;

    fn stock(available: i64) -> InventoryResolution {
        InventoryResolution {
            inventory_item_id: Some(InventoryItemId::new(1)),
            available: Some(available),
        }
    }

    fn order_ids(rows: &[ShipRow]) -> Vec<i64> {
        rows.iter().map(|r| r.order_id.as_i64()).collect()
    }

    /// Build an enriched order directly so the predicate can be hit exactly.
    fn enriched(
        id: i64,
        date: &str,
        variant: i64,
        available: i64,
        committed: i64,
        max_on_hand: i64,
    ) -> EnrichedOrder {
        let mut batch = enrich_orders(
            vec![order(id, date, vec![line_item(Some(variant), None, committed)])],
            &InventoryMap::new(),
            &TitleMap::new(),
        );
        let mut o = batch.remove(0);
        o.line_items[0].available_stock = available;
        o.max_on_hand.insert(VariantId::new(variant), max_on_hand);
        o
    }

    #[test]
    fn test_keeps_only_earliest_oversold_order_per_variant() {
        let orders = vec![
            enriched(1, "2024-01-03T00:00:00Z", 7, -2, 4, 4),
            enriched(2, "2024-01-01T00:00:00Z", 7, -2, 4, 4),
            enriched(3, "2024-01-02T00:00:00Z", 7, -2, 4, 4),
        ];

        let rows = select_rows(&orders, "Rs");

        assert_eq!(order_ids(&rows), vec![2]);
    }

    #[test]
    fn test_non_qualifying_items_pass_through() {
        let orders = vec![
            enriched(1, "2024-01-03T00:00:00Z", 7, -2, 4, 4),
            // Same variant, committed != on-hand: not oversold
            enriched(2, "2024-01-01T00:00:00Z", 7, -2, 1, 4),
            enriched(3, "2024-01-02T00:00:00Z", 7, -2, 4, 4),
            // Positive stock: never oversold
            enriched(4, "2024-01-04T00:00:00Z", 8, 3, 2, 5),
        ];

        let rows = select_rows(&orders, "Rs");

        assert_eq!(order_ids(&rows), vec![3, 2, 4]);
    }

    #[test]
    fn test_winner_keeps_position_of_first_oversold_variant() {
        let orders = vec![
            enriched(1, "2024-01-05T00:00:00Z", 7, -1, 2, 2),
            enriched(2, "2024-01-05T00:00:00Z", 8, -1, 2, 2),
            enriched(3, "2024-01-01T00:00:00Z", 7, -1, 2, 2),
        ];

        let rows = select_rows(&orders, "Rs");

        assert_eq!(order_ids(&rows), vec![3, 2]);
    }

    #[test]
    fn test_same_date_keeps_first_seen() {
        let orders = vec![
            enriched(1, "2024-01-01T00:00:00Z", 7, -1, 2, 2),
            enriched(2, "2024-01-01T00:00:00Z", 7, -1, 2, 2),
        ];

        assert_eq!(order_ids(&select_rows(&orders, "Rs")), vec![1]);
    }

    #[test]
    fn test_dates_compare_as_instants_across_offsets() {
        let orders = vec![
            // 2024-01-01T10:00Z
            enriched(1, "2024-01-01T05:00:00-05:00", 7, -1, 2, 2),
            // 2024-01-01T09:00Z, earlier despite the later wall clock
            enriched(2, "2024-01-01T14:30:00+05:30", 7, -1, 2, 2),
        ];

        assert_eq!(order_ids(&select_rows(&orders, "Rs")), vec![2]);
    }

    #[test]
    fn test_on_hand_is_replaced_by_batch_maximum() {
        let orders = enrich_orders(
            vec![
                order(1, "2024-01-01T00:00:00Z", vec![line_item(Some(7), None, 3)]),
                order(2, "2024-01-02T00:00:00Z", vec![line_item(Some(7), None, 2)]),
            ],
            &InventoryMap::from([(VariantId::new(7), stock(5))]),
            &TitleMap::new(),
        );

        let rows = select_rows(&orders, "Rs");

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.on_hand_stock == 10));
        assert_eq!(rows[0].inventory_label, "10 in Stock");
        assert_eq!(rows[0].committed_label, "3 items");
    }

    #[test]
    fn test_row_display_fields() {
        let mut orders = enrich_orders(
            vec![order(1, "2024-01-01T00:00:00Z", vec![line_item(None, None, 1)])],
            &InventoryMap::new(),
            &TitleMap::new(),
        );
        let rows = select_rows(&orders, "Rs");
        assert_eq!(rows[0].customer, "No Customer");
        assert_eq!(rows[0].total, "Rs 10.00");
        assert_eq!(rows[0].financial_status, "paid");
        assert_eq!(rows[0].fulfillment_status, "Unfulfilled");
        assert_eq!(rows[0].on_hand_stock, 0);

        orders[0].customer = Some(Customer {
            id: Some(1),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: None,
        });
        let rows = select_rows(&orders, "$");
        assert_eq!(rows[0].customer, "Ada Lovelace");
        assert_eq!(rows[0].total, "$ 10.00");
    }

    #[test]
    fn test_empty_batch_has_no_rows() {
        assert!(select_rows(&[], "Rs").is_empty());
    }
}
