//! Bearer token authentication for the dashboard API.
//!
//! When `DASHBOARD_API_TOKEN` is configured every `/api/*` handler requires
//! `Authorization: Bearer <token>`. Without a configured token the API is
//! open, which is only suitable behind an authenticating proxy.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::config::token_matches;
use crate::error::AppError;
use crate::state::AppState;

const MISSING_TOKEN: &str = "Missing bearer token";
const INVALID_TOKEN: &str = "Invalid bearer token";

/// Extractor that requires a valid API token.
///
/// Rejects with [`AppError::Unauthorized`].
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_auth: RequireApiAuth) -> impl IntoResponse {
///     "secret"
/// }
/// ```
pub struct RequireApiAuth;

impl FromRequestParts<AppState> for RequireApiAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config().api_token.as_ref() else {
            return Ok(Self);
        };

        let presented = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))?;

        if token_matches(expected, presented) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected API request with invalid token");
            Err(AppError::Unauthorized(INVALID_TOKEN.to_string()))
        }
    }
}

/// Extract the token from an `Authorization: Bearer` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}
