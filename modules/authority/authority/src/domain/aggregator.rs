//! Role aggregation: effective data scope and admin eligibility.

use authority_sdk::{Role, RoleType};
use tessera_security::DataScope;
use tracing::debug;

const PLATFORM_ADMIN_CODES: [&str; 3] = ["super", "super_admin", "superadmin"];
const TENANT_ADMIN_CODES: [&str; 3] = ["tenant_admin", "tenantadmin", "tenant-admin"];

/// Merge the data scopes of `roles` into one.
///
/// `ALL` wins outright. Otherwise the highest ranked scope is kept and the
/// first one seen wins a tie. Roles with an unrecognized scope are skipped;
/// with nothing left the result is `SELF`.
#[must_use]
pub fn merge_data_scope(roles: &[Role]) -> DataScope {
    let mut best: Option<DataScope> = None;
    for scope in roles.iter().filter_map(|r| r.data_scope) {
        if scope == DataScope::All {
            return DataScope::All;
        }
        if best.is_none_or(|b| scope.rank() > b.rank()) {
            best = Some(scope);
        }
    }
    best.unwrap_or(DataScope::SelfOnly)
}

/// Decides admin eligibility from role attributes.
///
/// The structural test and the explicit capability flags are checked first.
/// The role-code allow-lists only apply when `legacy_code_fallback` is on.
#[derive(Debug, Clone, Copy)]
pub struct RoleClassifier {
    legacy_code_fallback: bool,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RoleClassifier {
    #[must_use]
    pub fn new(legacy_code_fallback: bool) -> Self {
        Self {
            legacy_code_fallback,
        }
    }

    #[must_use]
    pub fn has_platform_admin_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| {
            let structural = role.data_scope == Some(DataScope::All)
                && role.role_type == Some(RoleType::System);
            if structural || role.is_platform_admin {
                return true;
            }
            let legacy = self.legacy_code_fallback && code_in(&role.code, &PLATFORM_ADMIN_CODES);
            if legacy {
                debug!(role_id = role.id, code = %role.code, "platform admin by legacy role code");
            }
            legacy
        })
    }

    #[must_use]
    pub fn has_tenant_admin_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| {
            let structural = matches!(
                role.data_scope,
                Some(DataScope::All | DataScope::UnitAndChild)
            );
            if structural || role.is_tenant_admin {
                return true;
            }
            let legacy = self.legacy_code_fallback && code_in(&role.code, &TENANT_ADMIN_CODES);
            if legacy {
                debug!(role_id = role.id, code = %role.code, "tenant admin by legacy role code");
            }
            legacy
        })
    }
}

fn code_in(code: &str, allowed: &[&str]) -> bool {
    let code = code.to_lowercase();
    allowed.contains(&code.as_str())
}
