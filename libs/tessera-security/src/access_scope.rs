use crate::data_scope::DataScope;
use crate::viewer::Viewer;

/// Row filter derived from a [`Viewer`], consumed by query builders.
///
/// A default scope is "deny all": it names no tenant and is not unrestricted.
#[derive(Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct AccessScope {
    pub(crate) unrestricted: bool,
    pub(crate) tenant_ids: Vec<u32>,
    pub(crate) org_unit_ids: Vec<u32>,
    pub(crate) include_descendants: bool,
    pub(crate) owner_id: Option<u32>,
}

impl AccessScope {
    /// Build the scope for a viewer.
    ///
    /// System admins see everything. Everyone else is pinned to their tenant
    /// and then narrowed by data scope; a unit-based scope without an
    /// effective org unit degrades to owner-only.
    #[must_use]
    pub fn for_viewer(viewer: &dyn Viewer) -> Self {
        if viewer.is_system_admin() {
            return Self::unrestricted();
        }
        if viewer.user_id() == 0 {
            return Self::default();
        }

        let tenant = Self::tenant(viewer.tenant_id());
        let unit = viewer.org_unit_id();
        match (viewer.data_scope(), unit) {
            (DataScope::All, _) => tenant,
            (DataScope::UnitAndChild, Some(ou)) => tenant.with_org_units(vec![ou], true),
            (DataScope::UnitOnly | DataScope::SelectedUnits, Some(ou)) => {
                tenant.with_org_units(vec![ou], false)
            }
            (_, _) => tenant.with_owner(viewer.user_id()),
        }
    }

    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            unrestricted: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tenant(tenant_id: u32) -> Self {
        Self::tenants_only(vec![tenant_id])
    }

    #[must_use]
    pub fn tenants_only(tenant_ids: Vec<u32>) -> Self {
        Self {
            tenant_ids,
            ..Self::default()
        }
    }

    /// Restrict to the given org units, optionally including their subtrees.
    /// For `SELECTED_UNITS` viewers callers replace the single effective unit
    /// with the explicit selection.
    #[must_use]
    pub fn with_org_units(mut self, org_unit_ids: Vec<u32>, include_descendants: bool) -> Self {
        self.org_unit_ids = org_unit_ids;
        self.include_descendants = include_descendants;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner_id: u32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.unrestricted
    }

    #[inline]
    #[must_use]
    pub fn tenant_ids(&self) -> &[u32] {
        &self.tenant_ids
    }

    #[inline]
    #[must_use]
    pub fn org_unit_ids(&self) -> &[u32] {
        &self.org_unit_ids
    }

    #[must_use]
    pub fn include_descendants(&self) -> bool {
        self.include_descendants
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<u32> {
        self.owner_id
    }

    /// Returns true if this scope grants nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.unrestricted && self.tenant_ids.is_empty()
    }
}
