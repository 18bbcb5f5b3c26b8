//! Store info handler.

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::Result, middleware::RequireApiAuth, routes::products::DataResponse, shopify::Shop,
    state::AppState,
};

/// Build the store router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/store/info", get(store_info))
}

/// The shop record, wrapped in a one-element list.
///
/// # Errors
///
/// Returns an error if the Shopify call fails.
pub async fn store_info(
    _auth: RequireApiAuth,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Shop>>>> {
    let shop = state.shopify().get_shop().await?;
    Ok(Json(DataResponse { data: vec![shop] }))
}
