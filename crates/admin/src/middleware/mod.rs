//! HTTP middleware and extractors.
//!
//! Layer order (outermost first): Sentry hub and transaction, `TraceLayer`,
//! then per-handler [`auth::RequireApiAuth`] on `/api/*` routes.

pub mod auth;

pub use auth::RequireApiAuth;
