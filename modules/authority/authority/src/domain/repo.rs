//! Ports for the domain layer: the lookups and stores resolution needs.
//!
//! Object-safe and async-friendly via `async_trait`; the service holds each
//! one as an `Arc<dyn ...>` handed in at construction.

use async_trait::async_trait;
use authority_sdk::{MembershipIds, OrgUnit, Role, User};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Reads the ids bound to a (user, tenant) membership.
#[async_trait]
pub trait MembershipReader: Send + Sync {
    /// Role, position and org-unit ids of the user's membership in `tenant_id`.
    ///
    /// Only rows whose `end_at` is absent or in the future count. The
    /// `status` columns are not consulted: a suspended membership or a
    /// disabled role binding still resolves until its window closes.
    /// Fails with [`DomainError::MembershipNotFound`] when no membership matches.
    async fn list_membership_all_ids(
        &self,
        user_id: u32,
        tenant_id: u32,
    ) -> Result<MembershipIds, DomainError>;
}

#[async_trait]
pub trait RoleReader: Send + Sync {
    async fn list_roles_by_ids(&self, ids: &[u32]) -> Result<Vec<Role>, DomainError>;

    async fn list_role_codes_by_ids(&self, ids: &[u32]) -> Result<Vec<String>, DomainError>;
}

#[async_trait]
pub trait OrgUnitReader: Send + Sync {
    async fn list_org_units_by_ids(&self, ids: &[u32]) -> Result<Vec<OrgUnit>, DomainError>;
}

/// Identity lookups and credential checks.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(false)` for an unknown user as well as for a wrong password.
    async fn verify_credential(&self, username: &str, password: &str)
    -> Result<bool, DomainError>;

    async fn get_by_username(&self, username: &str) -> Result<User, DomainError>;

    async fn get_by_id(&self, id: u32) -> Result<User, DomainError>;
}

/// Server-side record of issued tokens, keyed by user.
///
/// Refresh tokens are tracked so they can be rotated and revoked; access
/// tokens only so that logout can drop them.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save_access_token(
        &self,
        user_id: u32,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), DomainError>;

    async fn save_refresh_token(
        &self,
        user_id: u32,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), DomainError>;

    async fn refresh_token_exists(&self, user_id: u32, token: &str) -> Result<bool, DomainError>;

    /// Returns whether the token was present.
    async fn remove_refresh_token(&self, user_id: u32, token: &str) -> Result<bool, DomainError>;

    /// Atomically check and remove an unexpired refresh token.
    ///
    /// Of several concurrent calls with the same token at most one gets `true`.
    async fn consume_refresh_token(&self, user_id: u32, token: &str)
    -> Result<bool, DomainError>;

    /// Drop every token of the user.
    async fn remove_all(&self, user_id: u32) -> Result<(), DomainError>;
}
