//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `ready_to_ship` - Orchestrates one aggregation request
//! - `inventory` - Variant to available-stock resolution
//! - `titles` - Product title resolution
//! - `enrichment` - Joins lookups onto line items and derives on-hand stock
//! - `ship_rows` - Table rows with oversold variants collapsed
//! - `product_creator` - Sample products for development stores

pub mod enrichment;
pub mod inventory;
pub mod product_creator;
pub mod ready_to_ship;
pub mod ship_rows;
pub mod titles;

pub use enrichment::{EnrichedLineItem, EnrichedOrder, enrich_orders};
pub use inventory::{InventoryResolution, resolve_inventory};
pub use ready_to_ship::{ReadyToShipError, ReadyToShipService, Stage};
pub use ship_rows::{ShipRow, select_rows};
