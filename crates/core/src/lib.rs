//! Shipready Core - Shared types library.
//!
//! This crate provides the types shared by the dashboard backend and its
//! integration tests:
//! - `admin` - Ready-to-ship dashboard backend
//! - `integration-tests` - End-to-end tests against a fake upstream
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify IDs, money amounts and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
