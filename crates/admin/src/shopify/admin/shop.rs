//! Shop information for the Admin REST API.

use tracing::instrument;

use super::AdminClient;
use crate::shopify::{
    ShopifyError,
    types::{Shop, ShopEnvelope},
};

impl AdminClient {
    /// Get the shop record for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_shop(&self) -> Result<Shop, ShopifyError> {
        let envelope: ShopEnvelope = self.get_json("shop.json", &[] as &[(&str, &str)]).await?;
        Ok(envelope.shop)
    }
}
