//! Shopify Admin REST resource types.
//!
//! Only the fields the dashboard reads are modelled; everything else in the
//! upstream payload is ignored on deserialization. Resources that are passed
//! straight through to the frontend (`Product`, `Shop`) keep unknown fields in
//! `extra` so nothing is lost.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shipready_core::{
    FinancialStatus, FulfillmentStatus, InventoryItemId, LocationId, Money, OrderId, ProductId,
    ShopId, VariantId,
};

// =============================================================================
// Orders
// =============================================================================

/// An order from `orders.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Display number (e.g., `#1001`).
    pub name: String,
    /// When the order was placed.
    pub created_at: DateTime<FixedOffset>,
    /// Order total including taxes and shipping.
    pub total_price: Money,
    /// Customer who placed the order (absent for guest/POS orders).
    #[serde(default)]
    pub customer: Option<Customer>,
    /// Payment state.
    pub financial_status: FinancialStatus,
    /// Fulfillment state (`None` means unfulfilled).
    #[serde(default)]
    pub fulfillment_status: Option<FulfillmentStatus>,
    /// Line items in display order.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// A line item within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID.
    pub id: i64,
    /// Variant ID (`None` for custom items and deleted variants).
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    /// Product ID (`None` for custom items and deleted products).
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Quantity still to be fulfilled.
    pub fulfillable_quantity: i64,
    /// Line item title at time of purchase.
    #[serde(default)]
    pub title: Option<String>,
}

/// Customer summary embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    #[serde(default)]
    pub id: Option<i64>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl Customer {
    /// Full name when both parts are present and non-empty.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                Some(format!("{first} {last}"))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Variants & Inventory
// =============================================================================

/// A product variant from `variants/{id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID.
    pub id: VariantId,
    /// Parent product ID.
    pub product_id: ProductId,
    /// Inventory item backing this variant.
    #[serde(default)]
    pub inventory_item_id: Option<InventoryItemId>,
    /// Variant title.
    #[serde(default)]
    pub title: Option<String>,
    /// SKU code.
    #[serde(default)]
    pub sku: Option<String>,
}

/// Inventory level of one item at one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLevel {
    /// Inventory item ID.
    pub inventory_item_id: InventoryItemId,
    /// Location ID.
    pub location_id: LocationId,
    /// Available quantity (`None` when the item is not tracked).
    #[serde(default)]
    pub available: Option<i64>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

// =============================================================================
// Products & Shop
// =============================================================================

/// A product from `products.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Remaining upstream fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Shop record from `shop.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// Shop ID.
    pub id: ShopId,
    /// Shop name.
    pub name: String,
    /// Remaining upstream fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input for `POST products.json`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    /// Product title.
    pub title: String,
    /// Publication status (`active`, `draft`, `archived`).
    pub status: String,
    /// Initial variants.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<NewVariant>,
}

/// Variant input nested in [`NewProduct`].
#[derive(Debug, Clone, Serialize)]
pub struct NewVariant {
    /// Selling price.
    pub price: Money,
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersEnvelope {
    pub orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariantEnvelope {
    pub variant: Variant,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryLevelsEnvelope {
    pub inventory_levels: Vec<InventoryLevel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProductEnvelope<'a> {
    pub product: &'a NewProduct,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountEnvelope {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShopEnvelope {
    pub shop: Shop,
}
