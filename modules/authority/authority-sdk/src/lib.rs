//! Authority SDK
//!
//! This crate provides the public API for the `authority` module:
//! - `AuthenticationApi` trait (login, refresh, logout, token validation, who-am-i)
//! - Model types for roles, org units, users and the resolved authority
//! - Error type (`AuthorityError`) with stable reason codes
//!
//! ## Usage
//!
//! ```ignore
//! use authority_sdk::{AuthenticationApi, GrantType, LoginRequest};
//!
//! let tokens = api.login(LoginRequest::password("admin", "secret")).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::AuthenticationApi;
pub use errors::{AuthorityError, reason};
pub use models::{
    EffectiveAuthority, GrantType, LoginRequest, MembershipIds, OrgUnit, Role, RoleType,
    TokenResponse, TokenType, User, ValidateTokenResponse, ValidatedClaims, WhoAmIResponse,
};
