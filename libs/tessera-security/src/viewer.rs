use std::sync::Arc;

use crate::OperatorMetadata;
use crate::constants::PLATFORM_TENANT_ID;
use crate::data_scope::DataScope;

/// Read-only capability view handed to data-access code for row scoping.
///
/// Implementors provide the raw facts; the derived predicates are shared so
/// every variant answers them the same way.
pub trait Viewer: Send + Sync {
    fn user_id(&self) -> u32;

    fn tenant_id(&self) -> u32;

    fn is_platform_admin(&self) -> bool;

    fn data_scope(&self) -> DataScope;

    fn org_unit_id(&self) -> Option<u32>;

    /// Tenant the viewer acts in, `None` in the platform context.
    fn tenant(&self) -> Option<u32> {
        let tid = self.tenant_id();
        (tid != PLATFORM_TENANT_ID).then_some(tid)
    }

    fn is_system_admin(&self) -> bool {
        self.is_platform_admin() && self.tenant_id() == PLATFORM_TENANT_ID
    }

    fn is_tenant_admin(&self) -> bool {
        self.tenant_id() > PLATFORM_TENANT_ID && self.data_scope() == DataScope::UnitAndChild
    }

    fn is_admin(&self) -> bool {
        self.is_system_admin() || self.is_tenant_admin()
    }

    fn is_platform_context(&self) -> bool {
        self.tenant_id() == PLATFORM_TENANT_ID
    }

    fn is_tenant_context(&self) -> bool {
        self.tenant_id() > PLATFORM_TENANT_ID
    }
}

pub type ViewerRef = Arc<dyn Viewer>;

/// Viewer backed by the operator decoded from the current request.
#[derive(Debug, Clone)]
pub struct UserViewer {
    operator: OperatorMetadata,
}

impl UserViewer {
    #[must_use]
    pub fn new(operator: OperatorMetadata) -> Self {
        Self { operator }
    }

    #[must_use]
    pub fn operator(&self) -> &OperatorMetadata {
        &self.operator
    }
}

impl From<OperatorMetadata> for UserViewer {
    fn from(operator: OperatorMetadata) -> Self {
        Self::new(operator)
    }
}

impl Viewer for UserViewer {
    fn user_id(&self) -> u32 {
        self.operator.user_id()
    }

    fn tenant_id(&self) -> u32 {
        self.operator.tenant_id()
    }

    fn is_platform_admin(&self) -> bool {
        self.operator.is_platform_admin()
    }

    fn data_scope(&self) -> DataScope {
        self.operator.data_scope()
    }

    fn org_unit_id(&self) -> Option<u32> {
        self.operator.org_unit_id()
    }
}

/// Viewer for background jobs and bootstrap code running outside a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn user_id(&self) -> u32 {
        0
    }

    fn tenant_id(&self) -> u32 {
        PLATFORM_TENANT_ID
    }

    fn is_platform_admin(&self) -> bool {
        true
    }

    fn data_scope(&self) -> DataScope {
        DataScope::All
    }

    fn org_unit_id(&self) -> Option<u32> {
        None
    }
}

/// Viewer with no identity. Sees only rows it owns, which is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousViewer;

impl Viewer for AnonymousViewer {
    fn user_id(&self) -> u32 {
        0
    }

    fn tenant_id(&self) -> u32 {
        PLATFORM_TENANT_ID
    }

    fn is_platform_admin(&self) -> bool {
        false
    }

    fn data_scope(&self) -> DataScope {
        DataScope::SelfOnly
    }

    fn org_unit_id(&self) -> Option<u32> {
        None
    }
}
