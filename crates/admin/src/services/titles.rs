//! Product title resolution.

use tracing::instrument;

use shipready_core::ProductId;

use crate::shopify::{AdminClient, Product, ShopifyError};

use super::enrichment::TitleMap;

/// Fetch titles for the given products.
///
/// Products that no longer exist are simply missing from the map.
///
/// # Errors
///
/// Returns an error if any product batch request fails.
#[instrument(skip(client, product_ids), fields(products = product_ids.len()))]
pub async fn resolve_titles(
    client: &AdminClient,
    product_ids: &[ProductId],
) -> Result<TitleMap, ShopifyError> {
    if product_ids.is_empty() {
        return Ok(TitleMap::new());
    }

    let products = client.get_products_by_ids(product_ids).await?;
    Ok(title_map(products))
}

/// Index products by ID.
#[must_use]
pub fn title_map(products: impl IntoIterator<Item = Product>) -> TitleMap {
    products
        .into_iter()
        .map(|product| (product.id, product.title))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    #[test]
    fn test_title_map_indexes_by_id() {
        let products = vec![
            Product {
                id: ProductId::new(1),
                title: "Tee".to_string(),
                extra: Map::new(),
            },
            Product {
                id: ProductId::new(2),
                title: "Hoodie".to_string(),
                extra: Map::new(),
            },
        ];

        let map = title_map(products);

        assert_eq!(map.get(&ProductId::new(2)).map(String::as_str), Some("Hoodie"));
        assert_eq!(map.len(), 2);
    }
}
