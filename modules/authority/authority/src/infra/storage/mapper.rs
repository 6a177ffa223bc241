use authority_sdk::{OrgUnit, Role, RoleType, User};
use tessera_security::DataScope;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{org_unit, role, user};

/// Narrow a stored id to the domain's `u32`.
pub(crate) fn to_u32(field: &str, value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| DomainError::invalid_data(field, format!("{value} out of range")))
}

pub(crate) fn ids_to_u32(field: &str, values: Vec<i64>) -> Result<Vec<u32>, DomainError> {
    values.into_iter().map(|v| to_u32(field, v)).collect()
}

pub(crate) fn ids_to_i64(ids: &[u32]) -> Vec<i64> {
    ids.iter().copied().map(i64::from).collect()
}

impl TryFrom<role::Model> for Role {
    type Error = DomainError;

    fn try_from(m: role::Model) -> Result<Self, Self::Error> {
        // Unknown scope or type values load as `None` instead of failing the lookup.
        let data_scope = m.data_scope.parse::<DataScope>().ok();
        let role_type = m.role_type.parse::<RoleType>().ok();
        if data_scope.is_none() || role_type.is_none() {
            debug!(role_id = m.id, data_scope = %m.data_scope, role_type = %m.role_type, "unrecognized role attribute");
        }
        Ok(Self {
            id: to_u32("roles.id", m.id)?,
            tenant_id: to_u32("roles.tenant_id", m.tenant_id)?,
            code: m.code,
            name: m.name,
            data_scope,
            role_type,
            is_platform_admin: m.is_platform_admin,
            is_tenant_admin: m.is_tenant_admin,
        })
    }
}

impl TryFrom<org_unit::Model> for OrgUnit {
    type Error = DomainError;

    fn try_from(m: org_unit::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: to_u32("org_units.id", m.id)?,
            tenant_id: to_u32("org_units.tenant_id", m.tenant_id)?,
            name: m.name,
            path: m.path,
        })
    }
}

/// Role and org-unit fields stay empty until authority resolution.
impl TryFrom<user::Model> for User {
    type Error = DomainError;

    fn try_from(m: user::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: to_u32("users.id", m.id)?,
            tenant_id: to_u32("users.tenant_id", m.tenant_id)?,
            username: m.username,
            ..User::default()
        })
    }
}
