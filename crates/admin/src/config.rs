//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token for the installed app
//!
//! ## Optional
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (falls back to `BACKEND_PORT`, then `PORT`, then 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-01)
//! - `SHOPIFY_TIMEOUT_SECS` - Upstream request timeout (default: 30)
//! - `LOOKUP_CONCURRENCY` - Max in-flight inventory lookups per request (default: 8)
//! - `DISPLAY_CURRENCY` - Prefix for totals in table rows (default: Rs)
//! - `DASHBOARD_API_TOKEN` - Bearer token required on `/api/*` routes
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sampling (default: 1.0)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2024-01";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;
const DEFAULT_DISPLAY_CURRENCY: &str = "Rs";
const MIN_API_TOKEN_LENGTH: usize = 24;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Maximum concurrent inventory lookups per request
    pub lookup_concurrency: usize,
    /// Prefix used when rendering order totals (e.g., "Rs")
    pub display_currency: String,
    /// Bearer token guarding `/api/*` (disabled when `None`)
    pub api_token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Emit JSON logs instead of human-readable text
    pub json_logs: bool,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Per-request timeout for upstream calls
    pub timeout: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ShopifyConfig {
    /// Store config with the default API version and timeout.
    #[must_use]
    pub fn new(store: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            store: store.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Base URL of the versioned Admin REST API.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}/admin/api/{}", self.store, self.api_version)
    }

    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = parse_env_or("SHOPIFY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: get_validated_secret("SHOPIFY_ACCESS_TOKEN")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let (port_var, port_value) = first_present_env(&["DASHBOARD_PORT", "BACKEND_PORT", "PORT"])
            .unwrap_or(("DASHBOARD_PORT", DEFAULT_PORT.to_string()));
        let port = port_value
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar(port_var.to_string(), e.to_string()))?;

        let shopify = ShopifyConfig::from_env()?;

        let lookup_concurrency = parse_env_or("LOOKUP_CONCURRENCY", DEFAULT_LOOKUP_CONCURRENCY)?;
        if lookup_concurrency == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "LOOKUP_CONCURRENCY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let display_currency = get_env_or_default("DISPLAY_CURRENCY", DEFAULT_DISPLAY_CURRENCY);
        let api_token = get_optional_env("DASHBOARD_API_TOKEN")
            .map(|token| validate_api_token(&token).map(|()| SecretString::from(token)))
            .transpose()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let json_logs = get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));

        Ok(Self {
            host,
            port,
            shopify,
            lookup_concurrency,
            display_currency,
            api_token,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            json_logs,
        })
    }

    /// Configuration with defaults for everything except the store.
    #[must_use]
    pub fn new(shopify: ShopifyConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            shopify,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            display_currency: DEFAULT_DISPLAY_CURRENCY.to_string(),
            api_token: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            json_logs: false,
        }
    }

    /// Whether `/api` routes accept requests without a token.
    #[must_use]
    pub const fn api_is_open(&self) -> bool {
        self.api_token.is_none()
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Return the first of `keys` that is set, with its value.
fn first_present_env<'a>(keys: &[&'a str]) -> Option<(&'a str, String)> {
    keys.iter()
        .find_map(|key| get_optional_env(key).map(|value| (*key, value)))
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Validate the dashboard bearer token (length plus strength).
fn validate_api_token(token: &str) -> Result<(), ConfigError> {
    if token.len() < MIN_API_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            "DASHBOARD_API_TOKEN".to_string(),
            format!(
                "must be at least {MIN_API_TOKEN_LENGTH} characters (got {})",
                token.len()
            ),
        ));
    }
    validate_secret_strength(token, "DASHBOARD_API_TOKEN")
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Compare a presented token against the configured one without early exit.
#[must_use]
pub fn token_matches(expected: &SecretString, presented: &str) -> bool {
    let expected = expected.expose_secret().as_bytes();
    let presented = presented.as_bytes();
    if expected.len() != presented.len() {
        return false;
    }
    expected
        .iter()
        .zip(presented)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> DashboardConfig {
        DashboardConfig::new(ShopifyConfig::new(
            "test.myshopify.com",
            SecretString::from("shpat_super_secret_access_token"),
        ))
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-access-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("shpat_9f8A7c6B5d4E3f2a1B0c", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_api_token_too_short() {
        assert!(validate_api_token("aB3$xY9!").is_err());
    }

    #[test]
    fn test_token_matches() {
        let expected = SecretString::from("aB3xY9mK2nL5pQ7rT0uW4zC6");
        assert!(token_matches(&expected, "aB3xY9mK2nL5pQ7rT0uW4zC6"));
        assert!(!token_matches(&expected, "aB3xY9mK2nL5pQ7rT0uW4zC7"));
        assert!(!token_matches(&expected, "short"));
    }

    #[test]
    fn test_api_is_open_without_token() {
        let mut config = test_config();
        assert!(config.api_is_open());

        config.api_token = Some(SecretString::from("aB3xY9mK2nL5pQ7rT0uW4zC6"));
        assert!(!config.api_is_open());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_shopify_base_url() {
        let config = test_config();
        assert_eq!(
            config.shopify.base_url(),
            "https://test.myshopify.com/admin/api/2024-01"
        );
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", test_config().shopify);

        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("2024-01"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_super_secret_access_token"));
    }
}
