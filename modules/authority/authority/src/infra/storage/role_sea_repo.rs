use async_trait::async_trait;
use authority_sdk::Role;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::domain::error::DomainError;
use crate::domain::repo::RoleReader;
use crate::infra::storage::entity::role;
use crate::infra::storage::mapper::ids_to_i64;

#[derive(Clone)]
pub struct SeaRoleRepository {
    db: DatabaseConnection,
}

impl SeaRoleRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleReader for SeaRoleRepository {
    async fn list_roles_by_ids(&self, ids: &[u32]) -> Result<Vec<Role>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        role::Entity::find()
            .filter(role::Column::Id.is_in(ids_to_i64(ids)))
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Role::try_from)
            .collect()
    }

    async fn list_role_codes_by_ids(&self, ids: &[u32]) -> Result<Vec<String>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(role::Entity::find()
            .select_only()
            .column(role::Column::Code)
            .filter(role::Column::Id.is_in(ids_to_i64(ids)))
            .order_by_asc(role::Column::Id)
            .into_tuple::<String>()
            .all(&self.db)
            .await?)
    }
}
