//! Shipready dashboard library.
//!
//! Backend for a merchant dashboard listing paid, unfulfilled Shopify
//! orders with a per-line-item on-hand stock estimate. Exposed as a library
//! so the router can be driven from integration tests.
//!
//! # Security
//!
//! Holds a Shopify Admin API token with order and inventory scopes. Set
//! `DASHBOARD_API_TOKEN` unless the service sits behind an authenticating
//! proxy.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
