//! HS256 implementation of [`TokenIssuer`] and [`TokenValidator`].
//!
//! Validation is pure: signature, issuer, expiry and token kind are checked
//! from the token alone, without touching any store.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use time::OffsetDateTime;

use crate::claims::{AuthorityGrant, TokenClaims, TokenKind, TokenPair};
use crate::claims_error::ClaimsError;
use crate::config::AuthConfig;
use crate::config_error::ConfigError;
use crate::errors::AuthError;
use crate::traits::{TokenIssuer, TokenValidator};
use crate::validation::{ValidationConfig, validate_claims};

#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl: time::Duration,
    refresh_ttl: time::Duration,
    validation: ValidationConfig,
}

impl JwtTokenService {
    /// # Errors
    /// Fails when the configuration does not validate.
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let key = config.secret.expose_secret().as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            issuer: config.issuer.clone(),
            access_ttl: time::Duration::try_from(config.access_token_ttl).map_err(|_| {
                ConfigError::TtlOutOfRange {
                    field: "auth.access_token_ttl",
                }
            })?,
            refresh_ttl: time::Duration::try_from(config.refresh_token_ttl).map_err(|_| {
                ConfigError::TtlOutOfRange {
                    field: "auth.refresh_token_ttl",
                }
            })?,
            validation: config.validation(),
        })
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, ClaimsError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ClaimsError::EncodeFailed(e.to_string()))
    }

    /// Verify the signature and decode, leaving semantic checks to [`validate_claims`].
    fn verify(&self, token: &str) -> Result<TokenClaims, ClaimsError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        Ok(decode::<TokenClaims>(token, &self.decoding, &validation)?.claims)
    }

    /// Decode and fully validate a token.
    ///
    /// # Errors
    /// Any signature, format, issuer, expiry or kind failure.
    pub fn parse(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, ClaimsError> {
        let claims = self.verify(token)?;
        validate_claims(&claims, kind, &self.validation)?;
        Ok(claims)
    }

    /// Mint a pair at a fixed instant.
    ///
    /// # Errors
    /// Fails only if signing fails.
    pub fn issue_pair_at(
        &self,
        grant: &AuthorityGrant,
        now: OffsetDateTime,
    ) -> Result<TokenPair, ClaimsError> {
        let access = TokenClaims::for_grant(grant, TokenKind::Access, &self.issuer, now, self.access_ttl);
        let refresh =
            TokenClaims::for_grant(grant, TokenKind::Refresh, &self.issuer, now, self.refresh_ttl);

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
            access_expires_at: now + self.access_ttl,
            refresh_expires_at: now + self.refresh_ttl,
        })
    }
}

#[async_trait]
impl TokenIssuer for JwtTokenService {
    async fn issue_pair(&self, grant: &AuthorityGrant) -> Result<TokenPair, AuthError> {
        let pair = self.issue_pair_at(grant, OffsetDateTime::now_utc())?;
        tracing::debug!(
            user_id = grant.user_id,
            tenant_id = grant.tenant_id,
            data_scope = %grant.data_scope,
            "issued token pair"
        );
        Ok(pair)
    }
}

#[async_trait]
impl TokenValidator for JwtTokenService {
    async fn validate_and_parse(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<TokenClaims, AuthError> {
        self.parse(token, kind).map_err(|err| {
            tracing::debug!(error = %err, ?kind, "token rejected");
            AuthError::from(err)
        })
    }
}
