//! Shopify Admin REST API client.
//!
//! This module provides a typed client for the handful of Admin REST
//! resources the dashboard reads. Resource-specific calls live in the
//! submodules as `impl AdminClient` blocks.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::config::ShopifyConfig;

use super::ShopifyError;

mod inventory;
mod orders;
mod products;
mod shop;

pub use orders::OrderQuery;

/// Fallback wait when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Maximum page size accepted by REST list endpoints.
pub(crate) const MAX_PAGE_SIZE: usize = 250;

/// Shopify Admin REST API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    /// Versioned API root, always ending in `/`.
    base_url: Url,
    access_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl AdminClient {
    /// Create a new Admin API client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store domain does not form a valid URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        Self::with_base_url(&config.base_url(), config)
    }

    /// Create a client against an explicit API root (e.g. a local fake).
    ///
    /// `base_url` should be the versioned root such as
    /// `https://shop.myshopify.com/admin/api/2024-01`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn with_base_url(base_url: &str, config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shipready-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url,
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// The versioned API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Request Execution
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ShopifyError> {
        let url = self.inner.base_url.join(path)?;
        Ok(self
            .inner
            .client
            .request(method, url)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Accept", "application/json"))
    }

    /// `GET` a resource and decode its JSON envelope.
    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ShopifyError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        decode(path, response).await
    }

    /// `POST` a JSON body and decode the JSON envelope of the response.
    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ShopifyError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        decode(path, response).await
    }
}

/// Map a raw response to a decoded body or a classified error.
async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ShopifyError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let secs = secs.ceil().max(1.0) as u64;
                secs
            });
        return Err(ShopifyError::RateLimited(retry_after));
    }

    if status.is_success() {
        let bytes = response.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ShopifyError::Unauthorized(message),
        StatusCode::NOT_FOUND => ShopifyError::NotFound(path.to_string()),
        StatusCode::UNPROCESSABLE_ENTITY => ShopifyError::UserError(message),
        _ => ShopifyError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

/// Pull a readable message out of a REST error body.
///
/// Shopify uses `{"errors": "text"}`, `{"errors": ["a", "b"]}` and
/// `{"errors": {"field": ["msg"]}}` depending on the endpoint.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let errors = value.get("errors").or_else(|| value.get("error"))?;

    let message = match errors {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(json_text)
            .collect::<Vec<_>>()
            .join("; "),
        serde_json::Value::Object(fields) => fields
            .iter()
            .map(|(field, msgs)| match msgs {
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|m| format!("{field}: {}", json_text(m)))
                    .collect::<Vec<_>>()
                    .join("; "),
                other => format!("{field}: {}", json_text(other)),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    };

    (!message.is_empty()).then_some(message)
}

fn json_text(value: &serde_json::Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}
