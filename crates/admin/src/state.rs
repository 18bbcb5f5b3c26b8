//! Application state shared across handlers.

use std::sync::Arc;

use crate::{
    config::DashboardConfig,
    services::ReadyToShipService,
    shopify::{AdminClient, ShopifyError},
};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    shopify: AdminClient,
    ready_to_ship: ReadyToShipService,
}

impl AppState {
    /// Build state from configuration, creating the Shopify client.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be created.
    pub fn new(config: DashboardConfig) -> Result<Self, ShopifyError> {
        let shopify = AdminClient::new(&config.shopify)?;
        Ok(Self::with_client(config, shopify))
    }

    /// Build state around an existing client (e.g. one pointed at a fake upstream).
    #[must_use]
    pub fn with_client(config: DashboardConfig, shopify: AdminClient) -> Self {
        let ready_to_ship = ReadyToShipService::new(shopify.clone(), config.lookup_concurrency);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                ready_to_ship,
            }),
        }
    }

    /// Loaded configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Ready-to-ship aggregation service.
    #[must_use]
    pub fn ready_to_ship(&self) -> &ReadyToShipService {
        &self.inner.ready_to_ship
    }
}
