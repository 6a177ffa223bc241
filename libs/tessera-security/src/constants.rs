/// Tenant id of the platform (global) context. Real tenants start at 1.
pub const PLATFORM_TENANT_ID: u32 = 0;

/// Org unit id meaning "not attached to any unit".
pub const NO_ORG_UNIT_ID: u32 = 0;
