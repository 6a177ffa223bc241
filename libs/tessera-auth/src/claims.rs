use serde::{Deserialize, Serialize};
use tessera_security::{DataScope, OperatorMetadata};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::claims_error::ClaimsError;

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity plus resolved authority that gets bound into a token pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorityGrant {
    pub user_id: u32,
    pub username: String,
    pub tenant_id: u32,
    pub org_unit_id: Option<u32>,
    pub data_scope: DataScope,
    pub is_platform_admin: bool,
    pub is_tenant_admin: bool,
    pub roles: Vec<String>,
    pub client_id: Option<String>,
    pub device_id: Option<String>,
}

/// Signed access and refresh tokens issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: OffsetDateTime,
    pub refresh_expires_at: OffsetDateTime,
}

/// JWT payload. Short claim names keep tokens small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id, decimal.
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
    pub kind: TokenKind,
    pub username: String,
    #[serde(rename = "tid")]
    pub tenant_id: u32,
    #[serde(rename = "ouid", default, skip_serializing_if = "Option::is_none")]
    pub org_unit_id: Option<u32>,
    #[serde(rename = "ds")]
    pub data_scope: DataScope,
    #[serde(rename = "pad", default)]
    pub is_platform_admin: bool,
    #[serde(rename = "tad", default)]
    pub is_tenant_admin: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(rename = "cid", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(rename = "did", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl TokenClaims {
    /// Fresh claims for `grant`, valid from `now` for `ttl`.
    #[must_use]
    pub fn for_grant(
        grant: &AuthorityGrant,
        kind: TokenKind,
        issuer: &str,
        now: OffsetDateTime,
        ttl: time::Duration,
    ) -> Self {
        Self {
            sub: grant.user_id.to_string(),
            iss: issuer.to_owned(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            jti: Uuid::new_v4(),
            kind,
            username: grant.username.clone(),
            tenant_id: grant.tenant_id,
            org_unit_id: grant.org_unit_id,
            data_scope: grant.data_scope,
            is_platform_admin: grant.is_platform_admin,
            is_tenant_admin: grant.is_tenant_admin,
            roles: grant.roles.clone(),
            client_id: grant.client_id.clone(),
            device_id: grant.device_id.clone(),
        }
    }

    /// Parse the subject as a user id.
    ///
    /// # Errors
    /// [`ClaimsError::InvalidClaimFormat`] when `sub` is not a positive integer.
    pub fn user_id(&self) -> Result<u32, ClaimsError> {
        match self.sub.parse::<u32>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(ClaimsError::InvalidClaimFormat {
                field: "sub".to_owned(),
                reason: "must be a positive integer user id".to_owned(),
            }),
        }
    }

    /// # Errors
    /// [`ClaimsError::InvalidClaimFormat`] when `exp` is out of range.
    pub fn expires_at(&self) -> Result<OffsetDateTime, ClaimsError> {
        OffsetDateTime::from_unix_timestamp(self.exp).map_err(|_| ClaimsError::InvalidClaimFormat {
            field: "exp".to_owned(),
            reason: "invalid unix timestamp".to_owned(),
        })
    }
}

impl TryFrom<&TokenClaims> for OperatorMetadata {
    type Error = ClaimsError;

    fn try_from(claims: &TokenClaims) -> Result<Self, Self::Error> {
        Ok(OperatorMetadata::builder()
            .user_id(claims.user_id()?)
            .tenant_id(claims.tenant_id)
            .org_unit_id(claims.org_unit_id)
            .platform_admin(claims.is_platform_admin)
            .data_scope(claims.data_scope)
            .username(claims.username.clone())
            .build())
    }
}
