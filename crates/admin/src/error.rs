//! Unified error handling for the dashboard API.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"error": "...", "code": "..."}`; upstream failures are captured to
//! Sentry with their full detail while the client only sees a summary.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::ReadyToShipError;
use crate::shopify::ShopifyError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// The aggregation pipeline failed at a fatal stage.
    #[error(transparent)]
    ReadyToShip(#[from] ReadyToShipError),

    /// A passthrough Shopify call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Caller did not present a valid API token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable code.
    pub code: &'static str,
}

impl AppError {
    fn upstream(&self) -> Option<&ShopifyError> {
        match self {
            Self::ReadyToShip(e) => Some(&e.source),
            Self::Shopify(e) => Some(e),
            _ => None,
        }
    }

    fn status(&self) -> StatusCode {
        match self.upstream() {
            Some(ShopifyError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
            None => StatusCode::UNAUTHORIZED,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::ReadyToShip(_) | Self::Shopify(_) => "upstream_error",
            Self::Unauthorized(_) => "unauthorized",
        }
    }

    /// Message safe to show the caller.
    fn public_message(&self) -> String {
        match self {
            Self::ReadyToShip(e) => e.stage.describe().to_string(),
            Self::Shopify(_) => "External service error".to_string(),
            Self::Unauthorized(reason) => reason.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(upstream) = self.upstream() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                transient = upstream.is_transient(),
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }

        let retry_after = match self.upstream() {
            Some(ShopifyError::RateLimited(secs)) => Some(*secs),
            _ => None,
        };

        let body = ErrorBody {
            error: self.public_message(),
            code: self.code(),
        };
        let mut response = (self.status(), Json(body)).into_response();

        if let Some(secs) = retry_after
            && let Ok(value) = HeaderValue::from_str(&secs.to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }

        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
