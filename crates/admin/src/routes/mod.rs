//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//!
//! # Orders
//! GET  /api/orders/ready-to-ship        - Enriched paid, unfulfilled orders
//! GET  /api/orders/ready-to-ship/rows   - Table rows with oversold variants collapsed
//!
//! # Products
//! GET  /api/products/allProducts        - First page of products
//! GET  /api/products/count              - Product count
//! POST /api/products                    - Create sample products
//!
//! # Store
//! GET  /api/store/info                  - Shop record
//! ```
//!
//! Every `/api/*` handler takes [`RequireApiAuth`](crate::middleware::RequireApiAuth).

pub mod orders;
pub mod products;
pub mod store;

use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// All API routes, without state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .merge(products::router())
        .merge(store::router())
}

/// Full application: health check, API routes and request tracing.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{DashboardConfig, ShopifyConfig};
    use crate::shopify::AdminClient;

    pub(crate) const TEST_TOKEN: &str = "dK4pQ9sV2xB7nM5zR8wT3yL6";

    /// State whose client points at a port nothing listens on.
    pub(crate) fn unreachable_state(api_token: Option<&str>) -> AppState {
        let shopify = ShopifyConfig::new("test.myshopify.com", SecretString::from("shpat_test"));
        let client = AdminClient::with_base_url("http://127.0.0.1:9/admin/api/2024-01", &shopify)
            .unwrap();
        let mut config = DashboardConfig::new(shopify);
        config.api_token = api_token.map(SecretString::from);
        AppState::with_client(config, client)
    }

    pub(crate) async fn send(state: AppState, request: Request<Body>) -> Response {
        app(state).oneshot(request).await.unwrap()
    }

    pub(crate) async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(
            unreachable_state(Some(TEST_TOKEN)),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = send(
            unreachable_state(None),
            Request::get("/api/nope").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
