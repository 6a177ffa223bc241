use async_trait::async_trait;
use authority_sdk::User;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::repo::UserDirectory;
use crate::infra::password::{hash_password, verify_password};
use crate::infra::storage::entity::{MembershipStatus, user};

#[derive(Clone)]
pub struct SeaUserRepository {
    db: DatabaseConnection,
}

impl SeaUserRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, DomainError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    /// Register an active user with a freshly hashed password.
    ///
    /// # Errors
    /// Database failures, including a taken username.
    pub async fn create_user(
        &self,
        tenant_id: u32,
        username: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DomainError::unavailable(format!("hashing task failed: {e}")))??;

        let model = user::ActiveModel {
            tenant_id: Set(i64::from(tenant_id)),
            username: Set(username.to_owned()),
            password_hash: Set(password_hash),
            status: Set(MembershipStatus::Active),
            created_at: Set(OffsetDateTime::now_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        debug!(user_id = model.id, tenant_id, "user created");
        User::try_from(model)
    }
}

#[async_trait]
impl UserDirectory for SeaUserRepository {
    async fn verify_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, DomainError> {
        let Some(model) = self.find_by_username(username).await? else {
            return Ok(false);
        };
        if model.status != MembershipStatus::Active {
            warn!(user_id = model.id, status = ?model.status, "login attempt for inactive user");
            return Ok(false);
        }

        let password = password.to_owned();
        let hash = model.password_hash;
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| DomainError::unavailable(format!("verification task failed: {e}")))?
    }

    async fn get_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))
            .and_then(User::try_from)
    }

    async fn get_by_id(&self, id: u32) -> Result<User, DomainError> {
        user::Entity::find_by_id(i64::from(id))
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
            .and_then(User::try_from)
    }
}
