//! Product operations for the Admin REST API.

use tracing::instrument;

use shipready_core::ProductId;

use super::{AdminClient, MAX_PAGE_SIZE};
use crate::shopify::{
    ShopifyError,
    types::{
        CountEnvelope, NewProduct, NewProductEnvelope, Product, ProductEnvelope, ProductsEnvelope,
    },
};

impl AdminClient {
    /// List products (first page, up to 250).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ShopifyError> {
        let envelope: ProductsEnvelope = self
            .get_json("products.json", &[("limit", MAX_PAGE_SIZE.to_string())])
            .await?;
        Ok(envelope.products)
    }

    /// Fetch the products with the given IDs.
    ///
    /// IDs are sent in chunks of 250, the most `products.json?ids=` accepts
    /// per page. Missing products are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; partial results are discarded.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, ShopifyError> {
        let mut products = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_PAGE_SIZE) {
            let joined = chunk
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let envelope: ProductsEnvelope = self
                .get_json(
                    "products.json",
                    &[
                        ("ids", joined),
                        ("limit", MAX_PAGE_SIZE.to_string()),
                        ("fields", "id,title".to_string()),
                    ],
                )
                .await?;
            products.extend(envelope.products);
        }

        Ok(products)
    }

    /// Count all products in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_product_count(&self) -> Result<u64, ShopifyError> {
        let envelope: CountEnvelope = self
            .get_json("products/count.json", &[] as &[(&str, &str)])
            .await?;
        Ok(envelope.count)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the input, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(title = %product.title))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ShopifyError> {
        let envelope: ProductEnvelope = self
            .post_json("products.json", &NewProductEnvelope { product })
            .await?;
        Ok(envelope.product)
    }
}
