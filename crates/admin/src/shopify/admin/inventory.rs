//! Variant and inventory level lookups for the Admin REST API.

use tracing::instrument;

use shipready_core::{InventoryItemId, VariantId};

use super::AdminClient;
use crate::shopify::{
    ShopifyError,
    types::{InventoryLevel, InventoryLevelsEnvelope, Variant, VariantEnvelope},
};

impl AdminClient {
    /// Get a single product variant.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the variant no longer exists, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(variant_id = %id))]
    pub async fn get_variant(&self, id: VariantId) -> Result<Variant, ShopifyError> {
        let envelope: VariantEnvelope = self
            .get_json(&format!("variants/{id}.json"), &[] as &[(&str, &str)])
            .await?;
        Ok(envelope.variant)
    }

    /// Get the inventory levels of one item across all locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(inventory_item_id = %id))]
    pub async fn get_inventory_levels(
        &self,
        id: InventoryItemId,
    ) -> Result<Vec<InventoryLevel>, ShopifyError> {
        let envelope: InventoryLevelsEnvelope = self
            .get_json(
                "inventory_levels.json",
                &[("inventory_item_ids", id.to_string())],
            )
            .await?;
        Ok(envelope.inventory_levels)
    }
}
