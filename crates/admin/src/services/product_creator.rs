//! Sample product generator for fresh development stores.

use rand::{Rng, seq::IndexedRandom};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use shipready_core::Money;

use crate::shopify::{AdminClient, NewProduct, NewVariant, Product, ShopifyError};

/// Products created per request.
pub const DEFAULT_PRODUCTS_COUNT: usize = 5;

const ADJECTIVES: &[&str] = &[
    "autumn", "hidden", "bitter", "misty", "silent", "empty", "dry", "dark", "summer", "icy",
    "delicate", "quiet", "white", "cool", "spring", "winter", "patient", "twilight", "dawn",
    "crimson", "wispy", "weathered", "blue", "billowing", "broken", "cold", "damp", "falling",
    "frosty", "green", "long",
];

const NOUNS: &[&str] = &[
    "waterfall", "river", "breeze", "moon", "rain", "wind", "sea", "morning", "snow", "lake",
    "sunset", "pine", "shadow", "leaf", "dawn", "glitter", "forest", "hill", "cloud", "meadow",
    "sun", "glade", "bird", "brook", "butterfly", "bush", "dew", "dust", "field", "fire",
    "flower",
];

/// Random two-word title, e.g. `"misty meadow"`.
pub fn random_title(rng: &mut impl Rng) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("plain");
    let noun = NOUNS.choose(rng).copied().unwrap_or("product");
    format!("{adjective} {noun}")
}

/// Random price between 0.00 and 10.00.
pub fn random_price(rng: &mut impl Rng) -> Money {
    Money::new(Decimal::new(rng.random_range(0..=1000), 2))
}

/// Build a sample product with one variant.
pub fn sample_product(rng: &mut impl Rng) -> NewProduct {
    NewProduct {
        title: random_title(rng),
        status: "active".to_string(),
        variants: vec![NewVariant {
            price: random_price(rng),
        }],
    }
}

/// Create `count` sample products.
///
/// # Errors
///
/// Stops at and returns the first failed creation.
#[instrument(skip(client))]
pub async fn create_sample_products(
    client: &AdminClient,
    count: usize,
) -> Result<Vec<Product>, ShopifyError> {
    // Titles are drawn up front so no RNG handle is held across awaits
    let drafts: Vec<NewProduct> = {
        let mut rng = rand::rng();
        (0..count).map(|_| sample_product(&mut rng)).collect()
    };

    let mut created = Vec::with_capacity(count);
    for draft in &drafts {
        created.push(client.create_product(draft).await?);
    }

    info!(count = created.len(), "Created sample products");
    Ok(created)
}
