use crate::claims::{AuthorityGrant, TokenClaims, TokenKind, TokenPair};
use crate::errors::AuthError;
use async_trait::async_trait;

/// Validates and parses tokens
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate a token of the expected kind and return its claims
    async fn validate_and_parse(&self, token: &str, kind: TokenKind)
    -> Result<TokenClaims, AuthError>;
}

/// Mints token pairs for a resolved authority
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue_pair(&self, grant: &AuthorityGrant) -> Result<TokenPair, AuthError>;
}
