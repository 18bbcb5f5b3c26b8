//! Variant to inventory resolution.
//!
//! For every distinct variant in an order batch, look up its inventory item
//! and sum the `available` quantity across all locations. Lookups run
//! concurrently up to a fixed cap. A failed lookup never fails the batch: it
//! is logged and recorded as an unresolved placeholder.

use std::collections::HashMap;
use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use shipready_core::{InventoryItemId, VariantId};

use crate::shopify::{AdminClient, InventoryLevel, ShopifyError};

/// Outcome of resolving one variant's stock.
///
/// Either field is `None` when the corresponding lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InventoryResolution {
    /// Inventory item backing the variant.
    pub inventory_item_id: Option<InventoryItemId>,
    /// Stock available across all locations.
    pub available: Option<i64>,
}

impl InventoryResolution {
    /// Placeholder for a variant whose lookup failed outright.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            inventory_item_id: None,
            available: None,
        }
    }

    /// Whether a usable stock figure was obtained.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.available.is_some()
    }
}

/// Variant ID to resolution, for one request.
pub type InventoryMap = HashMap<VariantId, InventoryResolution>;

/// Sum `available` across locations; untracked levels count as zero.
#[must_use]
pub fn sum_available(levels: &[InventoryLevel]) -> i64 {
    levels.iter().filter_map(|level| level.available).sum()
}

/// Resolve stock for each variant using the Admin API.
///
/// `variant_ids` should already be deduplicated; duplicates are looked up
/// again and the last result wins.
#[instrument(skip(client, variant_ids), fields(variants = variant_ids.len()))]
pub async fn resolve_inventory(
    client: &AdminClient,
    variant_ids: &[VariantId],
    concurrency: usize,
) -> InventoryMap {
    resolve_with(variant_ids, concurrency, |variant_id| {
        resolve_variant(client, variant_id)
    })
    .await
}

/// Resolve one variant, degrading any failure to a placeholder.
async fn resolve_variant(client: &AdminClient, variant_id: VariantId) -> InventoryResolution {
    degrade_on_error(variant_id, try_resolve_variant(client, variant_id)).await
}

/// Variant lookup, then inventory levels.
///
/// A failed variant lookup is an error; a failed level lookup still reports
/// the inventory item with no stock figure.
async fn try_resolve_variant(
    client: &AdminClient,
    variant_id: VariantId,
) -> Result<InventoryResolution, ShopifyError> {
    let Some(inventory_item_id) = client.get_variant(variant_id).await?.inventory_item_id else {
        debug!(%variant_id, "Variant has no inventory item");
        return Ok(InventoryResolution::unresolved());
    };

    let available = match client.get_inventory_levels(inventory_item_id).await {
        Ok(levels) => Some(sum_available(&levels)),
        Err(e) => {
            warn!(%variant_id, %inventory_item_id, error = %e, "Failed to fetch inventory levels");
            None
        }
    };

    Ok(InventoryResolution {
        inventory_item_id: Some(inventory_item_id),
        available,
    })
}

/// Drive `lookup` over `variant_ids` with at most `concurrency` in flight.
///
/// Results are merged by key, so completion order does not matter.
pub async fn resolve_with<F, Fut>(
    variant_ids: &[VariantId],
    concurrency: usize,
    lookup: F,
) -> InventoryMap
where
    F: Fn(VariantId) -> Fut,
    Fut: Future<Output = InventoryResolution>,
{
    stream::iter(variant_ids.iter().copied())
        .map(|variant_id| {
            let fut = lookup(variant_id);
            async move { (variant_id, fut.await) }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

/// Turn a failed lookup into [`InventoryResolution::unresolved`].
pub async fn degrade_on_error<Fut>(variant_id: VariantId, fut: Fut) -> InventoryResolution
where
    Fut: Future<Output = Result<InventoryResolution, ShopifyError>>,
{
    match fut.await {
        Ok(resolution) => resolution,
        Err(e) => {
            warn!(%variant_id, error = %e, "Inventory lookup failed");
            InventoryResolution::unresolved()
        }
    }
}
