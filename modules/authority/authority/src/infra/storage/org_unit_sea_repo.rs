use async_trait::async_trait;
use authority_sdk::OrgUnit;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::error::DomainError;
use crate::domain::repo::OrgUnitReader;
use crate::infra::storage::entity::org_unit;
use crate::infra::storage::mapper::ids_to_i64;

#[derive(Clone)]
pub struct SeaOrgUnitRepository {
    db: DatabaseConnection,
}

impl SeaOrgUnitRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrgUnitReader for SeaOrgUnitRepository {
    /// Ordered by id, which decides ties in the most-specific pick.
    async fn list_org_units_by_ids(&self, ids: &[u32]) -> Result<Vec<OrgUnit>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        org_unit::Entity::find()
            .filter(org_unit::Column::Id.is_in(ids_to_i64(ids)))
            .order_by_asc(org_unit::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(OrgUnit::try_from)
            .collect()
    }
}
