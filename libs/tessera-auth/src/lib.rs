#![warn(warnings)]

pub mod claims;
pub mod claims_error;
pub mod config;
pub mod config_error;
pub mod errors;
pub mod jwt;
pub mod traits;
pub mod validation;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

pub use claims::{AuthorityGrant, TokenClaims, TokenKind, TokenPair};
pub use claims_error::ClaimsError;
pub use config::AuthConfig;
pub use config_error::ConfigError;
pub use errors::AuthError;
pub use jwt::JwtTokenService;
pub use traits::{TokenIssuer, TokenValidator};
pub use validation::{ValidationConfig, validate_claims};
