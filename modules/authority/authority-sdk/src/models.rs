//! Public models for the `authority` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `authority` module and its consumers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tessera_security::DataScope;
use time::OffsetDateTime;

use crate::errors::AuthorityError;

/// Role category. `System` roles are defined by the platform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    System,
    Tenant,
    Custom,
}

impl FromStr for RoleType {
    type Err = AuthorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SYSTEM" => Ok(RoleType::System),
            "TENANT" => Ok(RoleType::Tenant),
            "CUSTOM" => Ok(RoleType::Custom),
            _ => Err(AuthorityError::internal(format!("unknown role type: {s}"))),
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoleType::System => "SYSTEM",
            RoleType::Tenant => "TENANT",
            RoleType::Custom => "CUSTOM",
        })
    }
}

/// A role as seen by authority resolution.
///
/// `data_scope` and `role_type` are `None` when the stored value is not one
/// this build recognizes; such roles contribute nothing to scope merging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Role {
    pub id: u32,
    pub tenant_id: u32,
    pub code: String,
    pub name: String,
    pub data_scope: Option<DataScope>,
    pub role_type: Option<RoleType>,
    /// Explicit platform-admin capability.
    pub is_platform_admin: bool,
    /// Explicit tenant-admin capability.
    pub is_tenant_admin: bool,
}

/// An organisation unit with its materialized path, e.g. `/1/10/`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrgUnit {
    pub id: u32,
    pub tenant_id: u32,
    pub name: String,
    pub path: String,
}

impl OrgUnit {
    /// Number of non-empty path segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            0
        } else {
            trimmed.split('/').count()
        }
    }
}

/// A user as seen by authority resolution.
///
/// `role_ids`, `roles` and `org_unit_id` are filled in during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: u32,
    pub tenant_id: u32,
    pub username: String,
    pub role_ids: Vec<u32>,
    /// Role codes, carried into issued tokens.
    pub roles: Vec<String>,
    pub org_unit_id: Option<u32>,
}

/// Ids bound to one membership through its join relations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MembershipIds {
    pub role_ids: Vec<u32>,
    pub position_ids: Vec<u32>,
    pub org_unit_ids: Vec<u32>,
}

/// Authority computed at login or refresh. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectiveAuthority {
    pub data_scope: DataScope,
    pub is_platform_admin: bool,
    pub is_tenant_admin: bool,
    pub org_unit_id: Option<u32>,
}

impl EffectiveAuthority {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_platform_admin || self.is_tenant_admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Password,
    RefreshToken,
    ClientCredentials,
}

impl FromStr for GrantType {
    type Err = AuthorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(GrantType::Password),
            "refresh_token" => Ok(GrantType::RefreshToken),
            "client_credentials" => Ok(GrantType::ClientCredentials),
            _ => Err(AuthorityError::InvalidGrantType),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub grant_type: GrantType,
    pub username: Option<String>,
    pub password: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub device_id: Option<String>,
}

impl LoginRequest {
    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            grant_type: GrantType::Password,
            username: Some(username.into()),
            password: Some(password.into()),
            refresh_token: None,
            client_id: None,
            device_id: None,
        }
    }

    #[must_use]
    pub fn refresh(refresh_token: impl Into<String>) -> Self {
        Self {
            grant_type: GrantType::RefreshToken,
            username: None,
            password: None,
            refresh_token: Some(refresh_token.into()),
            client_id: None,
            device_id: None,
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("grant_type", &self.grant_type)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field("device_id", &self.device_id)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Bearer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token_type: TokenType,
    pub access_token: String,
    pub refresh_token: String,
}

/// Claims of a token that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedClaims {
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
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateTokenResponse {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<ValidatedClaims>,
}

impl ValidateTokenResponse {
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            claims: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: u32,
    pub username: String,
}
