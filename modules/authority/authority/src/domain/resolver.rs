//! Authority resolution: membership, roles and org units folded into one
//! [`EffectiveAuthority`].
//!
//! The membership lookup is fatal; the role and org-unit lookups are best
//! effort and degrade to "no roles" / "no org unit". The whole resolution
//! runs under one deadline, and a miss surfaces as a transient
//! `ServiceUnavailable`, never as a denial.

use std::sync::Arc;
use std::time::Duration;

use authority_sdk::{AuthorityError, EffectiveAuthority, OrgUnit, Role, User};
use tessera_security::DataScope;
use tessera_security::constants::PLATFORM_TENANT_ID;
use tracing::{debug, error, warn};

use crate::config::AuthorityConfig;
use crate::domain::aggregator::{RoleClassifier, merge_data_scope};
use crate::domain::org_unit::pick_most_specific;
use crate::domain::repo::{MembershipReader, OrgUnitReader, RoleReader};

#[derive(Clone)]
pub struct AuthorityResolver {
    memberships: Arc<dyn MembershipReader>,
    roles: Arc<dyn RoleReader>,
    org_units: Arc<dyn OrgUnitReader>,
    classifier: RoleClassifier,
    lookup_timeout: Duration,
}

impl AuthorityResolver {
    #[must_use]
    pub fn new(
        memberships: Arc<dyn MembershipReader>,
        roles: Arc<dyn RoleReader>,
        org_units: Arc<dyn OrgUnitReader>,
        config: &AuthorityConfig,
    ) -> Self {
        Self {
            memberships,
            roles,
            org_units,
            classifier: RoleClassifier::new(config.legacy_code_fallback),
            lookup_timeout: config.lookup_timeout,
        }
    }

    /// Resolve the effective authority of `user` in its tenant.
    ///
    /// Fills in `role_ids`, `roles` and `org_unit_id` on the user.
    ///
    /// # Errors
    /// `ServiceUnavailable` when the membership lookup fails or the deadline passes.
    pub async fn resolve(&self, user: &mut User) -> Result<EffectiveAuthority, AuthorityError> {
        let (user_id, tenant_id) = (user.id, user.tenant_id);
        if let Ok(res) = tokio::time::timeout(self.lookup_timeout, self.resolve_inner(user)).await {
            res
        } else {
            warn!(
                user_id,
                tenant_id,
                timeout_ms = u64::try_from(self.lookup_timeout.as_millis()).unwrap_or(u64::MAX),
                "authority resolution timed out"
            );
            Err(AuthorityError::service_unavailable(
                "authority resolution timed out",
            ))
        }
    }

    async fn resolve_inner(&self, user: &mut User) -> Result<EffectiveAuthority, AuthorityError> {
        let ids = self
            .memberships
            .list_membership_all_ids(user.id, user.tenant_id)
            .await
            .map_err(|e| {
                error!(user_id = user.id, tenant_id = user.tenant_id, error = %e, "list membership ids failed");
                AuthorityError::service_unavailable(format!("list membership ids failed: {e}"))
            })?;
        user.role_ids.clone_from(&ids.role_ids);

        let (roles, units) = tokio::join!(
            self.load_roles(user.id, &ids.role_ids),
            self.load_org_units(user.id, &ids.org_unit_ids)
        );
        user.roles.extend(roles.iter().map(|r| r.code.clone()));

        let mut authority = EffectiveAuthority {
            data_scope: merge_data_scope(&roles),
            ..EffectiveAuthority::default()
        };

        if user.tenant_id == PLATFORM_TENANT_ID {
            if self.classifier.has_platform_admin_role(&roles) {
                authority.is_platform_admin = true;
                authority.data_scope = DataScope::All;
            }
        } else if self.classifier.has_tenant_admin_role(&roles) {
            authority.is_tenant_admin = true;
        }

        if let Some(unit) = pick_most_specific(&units) {
            user.org_unit_id = Some(unit.id);
            authority.org_unit_id = Some(unit.id);
        }

        debug!(
            user_id = user.id,
            tenant_id = user.tenant_id,
            data_scope = %authority.data_scope,
            is_platform_admin = authority.is_platform_admin,
            is_tenant_admin = authority.is_tenant_admin,
            org_unit_id = ?authority.org_unit_id,
            "authority resolved"
        );
        Ok(authority)
    }

    async fn load_roles(&self, user_id: u32, ids: &[u32]) -> Vec<Role> {
        if ids.is_empty() {
            return Vec::new();
        }
        self.roles.list_roles_by_ids(ids).await.unwrap_or_else(|e| {
            warn!(user_id, error = %e, "role lookup failed, continuing without roles");
            Vec::new()
        })
    }

    async fn load_org_units(&self, user_id: u32, ids: &[u32]) -> Vec<OrgUnit> {
        if ids.is_empty() {
            return Vec::new();
        }
        self.org_units
            .list_org_units_by_ids(ids)
            .await
            .unwrap_or_else(|e| {
                warn!(user_id, error = %e, "org unit lookup failed, continuing without org unit");
                Vec::new()
            })
    }
}

/// Login and refresh gate: admin authority first, then a non-`SELF` scope.
///
/// # Errors
/// `InsufficientAuthority` or `InsufficientDataScope`.
pub fn check_gate(authority: &EffectiveAuthority) -> Result<(), AuthorityError> {
    if !authority.is_admin() {
        return Err(AuthorityError::InsufficientAuthority);
    }
    if authority.data_scope == DataScope::SelfOnly {
        return Err(AuthorityError::InsufficientDataScope);
    }
    Ok(())
}
