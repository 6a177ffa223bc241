use serde::{Deserialize, Serialize};

use crate::constants::NO_ORG_UNIT_ID;
use crate::data_scope::DataScope;

/// Snapshot of the caller's identity and resolved authority.
///
/// Built once per request from the validated access token and propagated to
/// downstream services through the `x-md-operator` header, so no hop has to
/// resolve authority again.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperatorMetadata {
    user_id: u32,
    tenant_id: u32,
    org_unit_id: u32,
    is_platform_admin: bool,
    data_scope: DataScope,
    username: String,
}

impl OperatorMetadata {
    #[must_use]
    pub fn builder() -> OperatorMetadataBuilder {
        OperatorMetadataBuilder::default()
    }

    #[must_use]
    pub fn user_id(&self) -> u32 {
        self.user_id
    }

    #[must_use]
    pub fn tenant_id(&self) -> u32 {
        self.tenant_id
    }

    /// Effective org unit, `None` when the operator is not attached to one.
    #[must_use]
    pub fn org_unit_id(&self) -> Option<u32> {
        (self.org_unit_id != NO_ORG_UNIT_ID).then_some(self.org_unit_id)
    }

    #[must_use]
    pub fn is_platform_admin(&self) -> bool {
        self.is_platform_admin
    }

    #[must_use]
    pub fn data_scope(&self) -> DataScope {
        self.data_scope
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Platform admin holding the unrestricted scope.
    #[must_use]
    pub fn is_sys_admin(&self) -> bool {
        self.is_platform_admin && self.data_scope == DataScope::All
    }
}

#[derive(Default)]
pub struct OperatorMetadataBuilder {
    user_id: Option<u32>,
    tenant_id: Option<u32>,
    org_unit_id: Option<u32>,
    is_platform_admin: bool,
    data_scope: Option<DataScope>,
    username: Option<String>,
}

impl OperatorMetadataBuilder {
    #[must_use]
    pub fn user_id(mut self, user_id: u32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn tenant_id(mut self, tenant_id: u32) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn org_unit_id(mut self, org_unit_id: Option<u32>) -> Self {
        self.org_unit_id = org_unit_id;
        self
    }

    #[must_use]
    pub fn platform_admin(mut self, is_platform_admin: bool) -> Self {
        self.is_platform_admin = is_platform_admin;
        self
    }

    #[must_use]
    pub fn data_scope(mut self, data_scope: DataScope) -> Self {
        self.data_scope = Some(data_scope);
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn build(self) -> OperatorMetadata {
        OperatorMetadata {
            user_id: self.user_id.unwrap_or_default(),
            tenant_id: self.tenant_id.unwrap_or_default(),
            org_unit_id: self.org_unit_id.unwrap_or(NO_ORG_UNIT_ID),
            is_platform_admin: self.is_platform_admin,
            data_scope: self.data_scope.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_least_privilege() {
        let op = OperatorMetadata::builder().user_id(7).build();
        assert_eq!(op.user_id(), 7);
        assert_eq!(op.tenant_id(), 0);
        assert_eq!(op.org_unit_id(), None);
        assert!(!op.is_platform_admin());
        assert_eq!(op.data_scope(), DataScope::SelfOnly);
        assert_eq!(op.username(), "");
    }

    #[test]
    fn sys_admin_requires_flag_and_all_scope() {
        let op = OperatorMetadata::builder()
            .platform_admin(true)
            .data_scope(DataScope::UnitOnly)
            .build();
        assert!(!op.is_sys_admin());

        let op = OperatorMetadata::builder()
            .platform_admin(true)
            .data_scope(DataScope::All)
            .build();
        assert!(op.is_sys_admin());
    }
}
