//! Order enrichment pass.
//!
//! Joins resolved inventory and product titles onto each order's line items
//! and derives an on-hand estimate per variant across the batch.
//!
//! # On-hand rule
//!
//! For a variant whose stock resolved, the k-th line item referencing it (in
//! batch order) reports `available + committed_1 + ... + committed_k`. A line
//! item without resolved stock reports zero available and its own committed
//! quantity as on-hand, and does not contribute to the running total.
//!
//! Every enriched order carries the batch-wide maximum on-hand per variant,
//! which the presentation layer uses in place of the per-item figure.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use shipready_core::{FinancialStatus, FulfillmentStatus, Money, OrderId, ProductId, VariantId};

use crate::shopify::{Customer, LineItem, Order};

use super::inventory::InventoryMap;

/// Product ID to title, for one request.
pub type TitleMap = HashMap<ProductId, String>;

/// Batch-wide maximum on-hand figure per variant.
pub type MaxOnHandMap = BTreeMap<VariantId, i64>;

/// A line item decorated with stock figures.
///
/// Field names on the wire are kept compatible with the dashboard frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedLineItem {
    /// Product title, if the product still exists.
    pub product_title: Option<String>,
    /// Product ID.
    pub product_id: Option<ProductId>,
    /// Variant ID.
    pub variant_id: Option<VariantId>,
    /// Stock available across locations (0 when unresolved).
    #[serde(rename = "available_Stock")]
    pub available_stock: i64,
    /// Quantity reserved by this line item.
    #[serde(rename = "committed_Stock")]
    pub committed_stock: i64,
    /// Derived on-hand estimate.
    #[serde(rename = "onHand_Stock")]
    pub on_hand_stock: i64,
}

/// An order decorated with per-line-item stock figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    /// Order ID.
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    /// Display number (e.g., `#1001`).
    #[serde(rename = "orderNumber")]
    pub order_number: String,
    /// When the order was placed.
    #[serde(rename = "orderDate")]
    pub order_date: DateTime<FixedOffset>,
    /// Order total.
    pub total_price: Money,
    /// Customer, if any.
    pub customer: Option<Customer>,
    /// Payment state.
    pub financial_status: FinancialStatus,
    /// Fulfillment state (`None` means unfulfilled).
    pub fulfillment_status: Option<FulfillmentStatus>,
    /// Enriched line items, in order.
    pub line_items: Vec<EnrichedLineItem>,
    /// Batch-wide maximum on-hand per variant.
    #[serde(rename = "maxOnHandStockMap")]
    pub max_on_hand: MaxOnHandMap,
}

/// Running stock for a variant across the batch.
#[derive(Debug, Clone, Copy)]
struct FirstStock {
    available: i64,
    committed: i64,
}

impl FirstStock {
    const fn on_hand(self) -> i64 {
        self.available + self.committed
    }
}

/// Distinct variant IDs in the batch, in first-seen order.
#[must_use]
pub fn distinct_variant_ids(orders: &[Order]) -> Vec<VariantId> {
    distinct(orders, |item| item.variant_id)
}

/// Distinct product IDs in the batch, in first-seen order.
#[must_use]
pub fn distinct_product_ids(orders: &[Order]) -> Vec<ProductId> {
    distinct(orders, |item| item.product_id)
}

fn distinct<T, F>(orders: &[Order], key: F) -> Vec<T>
where
    T: Copy + Eq + std::hash::Hash,
    F: Fn(&LineItem) -> Option<T>,
{
    let mut seen = HashSet::new();
    orders
        .iter()
        .flat_map(|order| order.line_items.iter())
        .filter_map(key)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Run the enrichment pass over an order batch.
#[must_use]
pub fn enrich_orders(
    orders: Vec<Order>,
    inventory: &InventoryMap,
    titles: &TitleMap,
) -> Vec<EnrichedOrder> {
    let mut first_stock: HashMap<VariantId, FirstStock> = HashMap::new();
    let mut max_on_hand = MaxOnHandMap::new();

    let mut enriched: Vec<EnrichedOrder> = orders
        .into_iter()
        .map(|order| {
            let line_items: Vec<EnrichedLineItem> = order
                .line_items
                .iter()
                .map(|item| enrich_line_item(item, inventory, titles, &mut first_stock))
                .collect();

            for item in &line_items {
                if let Some(variant_id) = item.variant_id {
                    max_on_hand
                        .entry(variant_id)
                        .and_modify(|max| *max = (*max).max(item.on_hand_stock))
                        .or_insert(item.on_hand_stock);
                }
            }

            EnrichedOrder {
                order_id: order.id,
                order_number: order.name,
                order_date: order.created_at,
                total_price: order.total_price,
                customer: order.customer,
                financial_status: order.financial_status,
                fulfillment_status: order.fulfillment_status,
                line_items,
                max_on_hand: MaxOnHandMap::new(),
            }
        })
        .collect();

    for order in &mut enriched {
        order.max_on_hand.clone_from(&max_on_hand);
    }

    enriched
}

fn enrich_line_item(
    item: &LineItem,
    inventory: &InventoryMap,
    titles: &TitleMap,
    first_stock: &mut HashMap<VariantId, FirstStock>,
) -> EnrichedLineItem {
    let committed = item.fulfillable_quantity;
    let product_title = item.product_id.and_then(|id| titles.get(&id).cloned());

    let resolved = item.variant_id.and_then(|variant_id| {
        inventory
            .get(&variant_id)
            .and_then(|resolution| resolution.available)
            .map(|available| (variant_id, available))
    });

    let (available_stock, on_hand_stock) = match resolved {
        Some((variant_id, available)) => {
            let stock = first_stock
                .entry(variant_id)
                .and_modify(|stock| stock.committed += committed)
                .or_insert(FirstStock {
                    available,
                    committed,
                });
            (available, stock.on_hand())
        }
        None => (0, committed),
    };

    EnrichedLineItem {
        product_title,
        product_id: item.product_id,
        variant_id: item.variant_id,
        available_stock,
        committed_stock: committed,
        on_hand_stock,
    }
}
