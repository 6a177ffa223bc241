//! Authority Module
//!
//! Resolves a user's effective authority (platform admin, tenant admin,
//! data scope, org unit) from membership data, binds it into signed token
//! pairs and exposes the login, refresh, logout, validate and who-am-i flows
//! over REST.
//!
//! ## Public API
//!
//! The public API is defined in the `authority-sdk` crate and re-exported here:
//! - `AuthenticationApi` - trait implemented by the authentication service
//! - `LoginRequest`, `TokenResponse`, `ValidateTokenResponse`, ... - data models
//! - `AuthorityError` - error type with stable reason codes
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use authority_sdk::{AuthenticationApi, AuthorityError, LoginRequest, TokenResponse};

// === MODULE DEFINITION ===
pub mod module;
pub use module::AuthorityModule;

pub mod config;
pub use config::AuthorityConfig;

// === INTERNAL MODULES ===
// Exposed for integration tests; only the SDK types are a stable API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
