//! Product handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;

use crate::{
    error::Result,
    middleware::RequireApiAuth,
    services::product_creator::{DEFAULT_PRODUCTS_COUNT, create_sample_products},
    shopify::Product,
    state::AppState,
};

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", post(create_products))
        .route("/api/products/allProducts", get(all_products))
        .route("/api/products/count", get(product_count))
}

/// `{data}` wrapper used by the list endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Result of the sample product creation.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    pub error: Option<String>,
}

/// First page of products.
///
/// # Errors
///
/// Returns an error if the Shopify call fails.
pub async fn all_products(
    _auth: RequireApiAuth,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Product>>>> {
    let data = state.shopify().get_products().await?;
    Ok(Json(DataResponse { data }))
}

/// Total product count.
///
/// # Errors
///
/// Returns an error if the Shopify call fails.
pub async fn product_count(
    _auth: RequireApiAuth,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>> {
    let count = state.shopify().get_product_count().await?;
    Ok(Json(CountResponse { count }))
}

/// Create a handful of randomly named products.
pub async fn create_products(
    _auth: RequireApiAuth,
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateResponse>) {
    match create_sample_products(state.shopify(), DEFAULT_PRODUCTS_COUNT).await {
        Ok(_) => (
            StatusCode::OK,
            Json(CreateResponse {
                success: true,
                error: None,
            }),
        ),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Failed to create products");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CreateResponse {
                    success: false,
                    error: Some("Failed to create products".to_string()),
                }),
            )
        }
    }
}
