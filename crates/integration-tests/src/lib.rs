//! Integration test harness for the Shipready dashboard.
//!
//! [`FakeShopify`] serves canned Admin REST responses on a local port.
//! [`TestContext`] starts the real dashboard router against it and hands
//! back a reqwest client pointed at the dashboard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shipready-integration-tests
//! ```

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use shipready_admin::{
    config::{DashboardConfig, ShopifyConfig},
    routes,
    shopify::AdminClient,
    state::AppState,
};

/// Bearer token the dashboard is configured with in tests.
pub const API_TOKEN: &str = "Zq8rT2mW5vN9xK3pL7bY4cH6";

const API_ROOT: &str = "/admin/api/2024-01";

// =============================================================================
// Fixtures
// =============================================================================

/// Canned upstream data.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    /// Orders returned by `orders.json`.
    pub orders: Vec<Value>,
    /// Variant ID to inventory item ID.
    pub variants: HashMap<i64, i64>,
    /// Variant lookups that fail with a 500.
    pub failing_variants: HashSet<i64>,
    /// Inventory item ID to `available` per location.
    pub levels: HashMap<i64, Vec<Option<i64>>>,
    /// Product ID to title.
    pub products: HashMap<i64, String>,
    /// Make `orders.json` fail with a 500.
    pub fail_orders: bool,
    /// Make `products.json` fail with a 502.
    pub fail_products: bool,
    /// Make `inventory_levels.json` fail with a 500.
    pub fail_levels: bool,
    /// Make every request fail with a 429.
    pub rate_limited: bool,
}

impl Fixtures {
    /// Add an order.
    #[must_use]
    pub fn order(mut self, order: Value) -> Self {
        self.orders.push(order);
        self
    }

    /// Add a variant with one inventory level per entry of `available`.
    #[must_use]
    pub fn stock(mut self, variant_id: i64, available: &[Option<i64>]) -> Self {
        let inventory_item_id = variant_id * 10;
        self.variants.insert(variant_id, inventory_item_id);
        self.levels.insert(inventory_item_id, available.to_vec());
        self
    }

    /// Add a product title.
    #[must_use]
    pub fn product(mut self, product_id: i64, title: &str) -> Self {
        self.products.insert(product_id, title.to_string());
        self
    }
}

/// An order payload as `orders.json` returns it.
///
/// Each item is `(variant_id, product_id, fulfillable_quantity)`.
#[must_use]
pub fn order_json(id: i64, created_at: &str, items: &[(Option<i64>, Option<i64>, i64)]) -> Value {
    let line_items: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(idx, (variant_id, product_id, qty))| {
            json!({
                "id": id * 100 + i64::try_from(idx).unwrap_or_default(),
                "variant_id": variant_id,
                "product_id": product_id,
                "fulfillable_quantity": qty,
                "title": "Line item",
            })
        })
        .collect();

    json!({
        "id": id,
        "name": format!("#{}", 1000 + id),
        "created_at": created_at,
        "total_price": "25.00",
        "financial_status": "paid",
        "fulfillment_status": null,
        "customer": {"id": 1, "first_name": "Ada", "last_name": "Lovelace"},
        "line_items": line_items,
    })
}

// =============================================================================
// Fake upstream
// =============================================================================

struct FakeState {
    fixtures: Fixtures,
    variant_hits: Mutex<HashMap<i64, usize>>,
    product_requests: Mutex<usize>,
    created: Mutex<Vec<Value>>,
}

/// A fake Shopify Admin REST API.
pub struct FakeShopify {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeShopify {
    /// Serve `fixtures` on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(fixtures: Fixtures) -> Self {
        let state = Arc::new(FakeState {
            fixtures,
            variant_hits: Mutex::new(HashMap::new()),
            product_requests: Mutex::new(0),
            created: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(&format!("{API_ROOT}/orders.json"), get(orders))
            .route(&format!("{API_ROOT}/variants/{{file}}"), get(variant))
            .route(&format!("{API_ROOT}/inventory_levels.json"), get(inventory_levels))
            .route(
                &format!("{API_ROOT}/products.json"),
                get(products).post(create_product),
            )
            .route(&format!("{API_ROOT}/products/count.json"), get(product_count))
            .route(&format!("{API_ROOT}/shop.json"), get(shop))
            .with_state(Arc::clone(&state));

        let addr = serve(app).await;
        Self { addr, state }
    }

    /// Versioned API root.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}{API_ROOT}", self.addr)
    }

    /// How many times `variants/{id}.json` was requested.
    #[must_use]
    pub fn variant_hits(&self, variant_id: i64) -> usize {
        self.state
            .variant_hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&variant_id)
            .copied()
            .unwrap_or(0)
    }

    /// How many times `GET products.json` was requested.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        *self
            .state
            .product_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Products received by `POST products.json`.
    #[must_use]
    pub fn created_products(&self) -> Vec<Value> {
        self.state
            .created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn upstream_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"errors": message}))).into_response()
}

fn rate_limited() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("Retry-After", "3")],
        Json(json!({"errors": "Exceeded 2 calls per second for api client."})),
    )
        .into_response()
}

async fn orders(State(state): State<Arc<FakeState>>) -> Response {
    if state.fixtures.rate_limited {
        return rate_limited();
    }
    if state.fixtures.fail_orders {
        return upstream_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    }
    Json(json!({"orders": state.fixtures.orders})).into_response()
}

async fn variant(State(state): State<Arc<FakeState>>, Path(file): Path<String>) -> Response {
    let Some(variant_id) = file
        .strip_suffix(".json")
        .and_then(|id| id.parse::<i64>().ok())
    else {
        return upstream_error(StatusCode::NOT_FOUND, "Not Found");
    };

    *state
        .variant_hits
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(variant_id)
        .or_default() += 1;

    if state.fixtures.failing_variants.contains(&variant_id) {
        return upstream_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    }

    match state.fixtures.variants.get(&variant_id) {
        Some(inventory_item_id) => Json(json!({
            "variant": {
                "id": variant_id,
                "product_id": 1,
                "inventory_item_id": inventory_item_id,
                "title": "Default Title",
            }
        }))
        .into_response(),
        None => upstream_error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn inventory_levels(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if state.fixtures.fail_levels {
        return upstream_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    }

    let Some(item_id) = query
        .get("inventory_item_ids")
        .and_then(|ids| ids.parse::<i64>().ok())
    else {
        return upstream_error(StatusCode::BAD_REQUEST, "inventory_item_ids required");
    };

    let levels: Vec<Value> = state
        .fixtures
        .levels
        .get(&item_id)
        .map(|available| {
            available
                .iter()
                .enumerate()
                .map(|(location, available)| {
                    json!({
                        "inventory_item_id": item_id,
                        "location_id": location + 1,
                        "available": available,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Json(json!({"inventory_levels": levels})).into_response()
}

async fn products(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    *state
        .product_requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner) += 1;

    if state.fixtures.rate_limited {
        return rate_limited();
    }
    if state.fixtures.fail_products {
        return upstream_error(StatusCode::BAD_GATEWAY, "secret upstream detail");
    }

    let wanted: Option<HashSet<i64>> = query
        .get("ids")
        .map(|ids| ids.split(',').filter_map(|id| id.parse().ok()).collect());

    let mut products: Vec<(&i64, &String)> = state
        .fixtures
        .products
        .iter()
        .filter(|(id, _)| wanted.as_ref().is_none_or(|w| w.contains(*id)))
        .collect();
    products.sort();

    let products: Vec<Value> = products
        .into_iter()
        .map(|(id, title)| json!({"id": id, "title": title, "vendor": "Shipready"}))
        .collect();

    Json(json!({"products": products})).into_response()
}

async fn product_count(State(state): State<Arc<FakeState>>) -> Response {
    Json(json!({"count": state.fixtures.products.len()})).into_response()
}

async fn create_product(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    let mut created = state
        .created
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let product = body.get("product").cloned().unwrap_or(Value::Null);
    created.push(product.clone());

    let mut product = product;
    if let Some(obj) = product.as_object_mut() {
        obj.insert("id".to_string(), json!(9000 + created.len()));
    }
    (StatusCode::CREATED, Json(json!({"product": product}))).into_response()
}

async fn shop() -> Response {
    Json(json!({
        "shop": {"id": 548_380_009, "name": "Shipready Test Store", "currency": "INR"}
    }))
    .into_response()
}

// =============================================================================
// Dashboard under test
// =============================================================================

/// A running dashboard wired to a fake upstream.
pub struct TestContext {
    /// HTTP client for the dashboard.
    pub client: reqwest::Client,
    /// Dashboard root URL.
    pub dashboard_url: String,
    /// The fake upstream.
    pub upstream: FakeShopify,
}

impl TestContext {
    /// Start a dashboard that requires [`API_TOKEN`].
    pub async fn new(fixtures: Fixtures) -> Self {
        Self::with_token(fixtures, Some(API_TOKEN)).await
    }

    /// Start a dashboard with an optional API token.
    ///
    /// # Panics
    ///
    /// Panics if the Shopify client cannot be built.
    pub async fn with_token(fixtures: Fixtures, api_token: Option<&str>) -> Self {
        let upstream = FakeShopify::start(fixtures).await;

        let shopify = ShopifyConfig::new("test.myshopify.com", SecretString::from("shpat_test"));
        let client = AdminClient::with_base_url(&upstream.base_url(), &shopify)
            .expect("Failed to build Shopify client");
        let mut config = DashboardConfig::new(shopify);
        config.lookup_concurrency = 2;
        config.api_token = api_token.map(SecretString::from);

        let addr = serve(routes::app(AppState::with_client(config, client))).await;

        Self {
            client: reqwest::Client::new(),
            dashboard_url: format!("http://{addr}"),
            upstream,
        }
    }

    /// Authenticated `GET`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.dashboard_url))
            .bearer_auth(API_TOKEN)
            .send()
            .await
            .expect("Request failed")
    }

    /// Authenticated `GET`, decoded as JSON with the status.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.get(path).await;
        let status = response.status();
        let body = response.json().await.expect("Response is not JSON");
        (status, body)
    }
}
