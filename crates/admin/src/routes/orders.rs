//! Ready-to-ship order handlers.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{
    error::Result,
    middleware::RequireApiAuth,
    services::{EnrichedOrder, ShipRow, select_rows},
    state::AppState,
};

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders/ready-to-ship", get(ready_to_ship))
        .route("/api/orders/ready-to-ship/rows", get(ready_to_ship_rows))
}

/// Response for the table view.
#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub rows: Vec<ShipRow>,
    pub total: usize,
}

/// Enriched paid, unfulfilled orders.
///
/// # Errors
///
/// Returns 500 with code `upstream_error` if the order or title fetch
/// fails, or 503 with `Retry-After` if Shopify rate limits the request.
pub async fn ready_to_ship(
    _auth: RequireApiAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrichedOrder>>> {
    let orders = state.ready_to_ship().ready_to_ship().await?;
    Ok(Json(orders))
}

/// Ready-to-ship table rows, oversold variants collapsed to their earliest order.
///
/// # Errors
///
/// Returns 500 with code `upstream_error` if the order or title fetch
/// fails, or 503 with `Retry-After` if Shopify rate limits the request.
pub async fn ready_to_ship_rows(
    _auth: RequireApiAuth,
    State(state): State<AppState>,
) -> Result<Json<RowsResponse>> {
    let orders = state.ready_to_ship().ready_to_ship().await?;
    let rows = select_rows(&orders, &state.config().display_currency);
    let total = rows.len();
    Ok(Json(RowsResponse { rows, total }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };

    use crate::routes::tests::{TEST_TOKEN, json, send, unreachable_state};

    #[tokio::test]
    async fn test_requires_token_when_configured() {
        let response = send(
            unreachable_state(Some(TEST_TOKEN)),
            Request::get("/api/orders/ready-to-ship")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_wrong_token_is_rejected() {
        let response = send(
            unreachable_state(Some(TEST_TOKEN)),
            Request::get("/api/orders/ready-to-ship/rows")
                .header(AUTHORIZATION, "Bearer not-the-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_sanitized_500() {
        let response = send(
            unreachable_state(Some(TEST_TOKEN)),
            Request::get("/api/orders/ready-to-ship")
                .header(AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json(response).await;
        assert_eq!(body["error"], "Failed to fetch orders from Shopify");
        assert_eq!(body["code"], "upstream_error");
    }
}
