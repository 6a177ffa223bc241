#![allow(clippy::unwrap_used, clippy::expect_used)]

use tessera_security::{
    AccessScope, AnonymousViewer, DataScope, OperatorMetadata, SystemViewer, UserViewer, Viewer,
};

fn user(tenant_id: u32, scope: DataScope, platform_admin: bool, ou: Option<u32>) -> UserViewer {
    OperatorMetadata::builder()
        .user_id(42)
        .tenant_id(tenant_id)
        .org_unit_id(ou)
        .platform_admin(platform_admin)
        .data_scope(scope)
        .build()
        .into()
}

#[test]
fn system_admin_requires_platform_context() {
    assert!(user(0, DataScope::All, true, None).is_system_admin());
    assert!(!user(3, DataScope::All, true, None).is_system_admin());
    assert!(!user(0, DataScope::All, false, None).is_system_admin());
}

#[test]
fn tenant_admin_is_derived_from_unit_and_child_scope() {
    assert!(user(5, DataScope::UnitAndChild, false, Some(1)).is_tenant_admin());
    assert!(!user(5, DataScope::All, false, None).is_tenant_admin());
    assert!(!user(0, DataScope::UnitAndChild, false, None).is_tenant_admin());
}

#[test]
fn tenant_and_context_queries() {
    let platform = user(0, DataScope::All, true, None);
    assert_eq!(platform.tenant(), None);
    assert!(platform.is_platform_context());
    assert!(!platform.is_tenant_context());
    assert!(platform.is_admin());

    let tenant = user(9, DataScope::UnitOnly, false, Some(4));
    assert_eq!(tenant.tenant(), Some(9));
    assert!(tenant.is_tenant_context());
    assert!(!tenant.is_admin());
    assert_eq!(tenant.org_unit_id(), Some(4));
    assert_eq!(tenant.data_scope(), DataScope::UnitOnly);
}

#[test]
fn built_in_viewers() {
    assert!(SystemViewer.is_system_admin());
    assert_eq!(SystemViewer.data_scope(), DataScope::All);

    assert!(!AnonymousViewer.is_admin());
    assert_eq!(AnonymousViewer.data_scope(), DataScope::SelfOnly);
}

#[test]
fn access_scope_follows_data_scope() {
    assert!(AccessScope::for_viewer(&SystemViewer).is_unrestricted());
    assert!(AccessScope::for_viewer(&AnonymousViewer).is_empty());

    let all = AccessScope::for_viewer(&user(7, DataScope::All, false, Some(2)));
    assert_eq!(all.tenant_ids(), &[7]);
    assert!(all.org_unit_ids().is_empty());
    assert_eq!(all.owner_id(), None);

    let subtree = AccessScope::for_viewer(&user(7, DataScope::UnitAndChild, false, Some(2)));
    assert_eq!(subtree.org_unit_ids(), &[2]);
    assert!(subtree.include_descendants());

    let unit = AccessScope::for_viewer(&user(7, DataScope::UnitOnly, false, Some(2)));
    assert_eq!(unit.org_unit_ids(), &[2]);
    assert!(!unit.include_descendants());

    let own = AccessScope::for_viewer(&user(7, DataScope::SelfOnly, false, Some(2)));
    assert_eq!(own.owner_id(), Some(42));
    assert!(own.org_unit_ids().is_empty());
}

#[test]
fn unit_scope_without_unit_degrades_to_owner() {
    let scope = AccessScope::for_viewer(&user(7, DataScope::UnitAndChild, false, None));
    assert_eq!(scope.tenant_ids(), &[7]);
    assert_eq!(scope.owner_id(), Some(42));
}
