//! `AuthenticationApi` trait definition.

use async_trait::async_trait;
use tessera_security::OperatorMetadata;

use crate::errors::AuthorityError;
use crate::models::{LoginRequest, TokenResponse, ValidateTokenResponse, WhoAmIResponse};

/// Public API trait for the `authority` module.
///
/// Operations acting on behalf of a logged-in caller take the
/// [`OperatorMetadata`] decoded from the current request.
#[async_trait]
pub trait AuthenticationApi: Send + Sync {
    /// Exchange credentials for a token pair.
    ///
    /// `password` and `refresh_token` grants are supported; `client_credentials`
    /// is always rejected with [`AuthorityError::InvalidGrantType`].
    async fn login(&self, req: LoginRequest) -> Result<TokenResponse, AuthorityError>;

    /// Rotate a refresh token. Only the `refresh_token` grant is accepted.
    async fn refresh_token(&self, req: LoginRequest) -> Result<TokenResponse, AuthorityError>;

    /// Revoke every token of the operator.
    async fn logout(&self, operator: &OperatorMetadata) -> Result<(), AuthorityError>;

    /// Check an access token. Invalid tokens are reported in the response, not as errors.
    async fn validate_token(&self, token: &str) -> Result<ValidateTokenResponse, AuthorityError>;

    async fn who_am_i(&self, operator: &OperatorMetadata)
    -> Result<WhoAmIResponse, AuthorityError>;
}
