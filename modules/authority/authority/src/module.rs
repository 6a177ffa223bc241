//! Composition root: builds the repositories, the resolver, the token
//! service and the HTTP router from a database connection and configuration.

use std::sync::Arc;
use std::time::Duration;

use authority_sdk::AuthenticationApi;
use axum::Router;
use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tessera_auth::{AuthConfig, ConfigError, JwtTokenService, TokenIssuer, TokenValidator};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::rest::routes;
use crate::config::{AuthorityConfig, AuthorityConfigError};
use crate::domain::resolver::AuthorityResolver;
use crate::domain::service::AuthenticationService;
use crate::infra::InMemoryTokenStore;
use crate::infra::token_store::run_token_sweeper;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaMembershipRepository, SeaOrgUnitRepository, SeaRoleRepository, SeaUserRepository,
};

/// Configuration rejected while wiring the module.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Auth(#[from] ConfigError),

    #[error(transparent)]
    Authority(#[from] AuthorityConfigError),
}

#[derive(Clone)]
pub struct AuthorityModule {
    service: Arc<AuthenticationService>,
    validator: Arc<dyn TokenValidator>,
    memberships: SeaMembershipRepository,
    users: SeaUserRepository,
    tokens: Arc<InMemoryTokenStore>,
    token_sweep_interval: Duration,
}

impl AuthorityModule {
    /// Wire the module over `db`.
    ///
    /// # Errors
    /// Fails when the auth or authority configuration does not validate.
    pub fn new(
        db: &DatabaseConnection,
        auth: &AuthConfig,
        cfg: &AuthorityConfig,
    ) -> Result<Self, InitError> {
        cfg.validate()?;
        let jwt = Arc::new(JwtTokenService::new(auth)?);
        let memberships = SeaMembershipRepository::new(db.clone());
        let roles = Arc::new(SeaRoleRepository::new(db.clone()));
        let users = SeaUserRepository::new(db.clone());
        let tokens = Arc::new(InMemoryTokenStore::new());

        let resolver = AuthorityResolver::new(
            Arc::new(memberships.clone()),
            roles.clone(),
            Arc::new(SeaOrgUnitRepository::new(db.clone())),
            cfg,
        );
        let issuer: Arc<dyn TokenIssuer> = jwt.clone();
        let validator: Arc<dyn TokenValidator> = jwt;
        let service = Arc::new(AuthenticationService::new(
            Arc::new(users.clone()),
            roles,
            tokens.clone(),
            resolver,
            issuer,
            validator.clone(),
        ));

        info!(
            legacy_code_fallback = cfg.legacy_code_fallback,
            issuer = %auth.issuer,
            "authority module initialized"
        );
        Ok(Self {
            service,
            validator,
            memberships,
            users,
            tokens,
            token_sweep_interval: cfg.token_sweep_interval,
        })
    }

    /// Start the periodic sweep of expired tokens; it stops when `cancel` fires.
    #[must_use]
    pub fn spawn_token_sweeper(&self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(run_token_sweeper(
            Arc::clone(&self.tokens),
            self.token_sweep_interval,
            cancel,
        ))
    }

    /// Apply the module's schema migrations.
    ///
    /// # Errors
    /// Database failures.
    pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
        info!("Running authority database migrations");
        Migrator::up(db, None).await?;
        info!("Authority database migrations completed successfully");
        Ok(())
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn AuthenticationApi> {
        self.service.clone()
    }

    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.api(), self.validator.clone())
    }

    #[must_use]
    pub fn validator(&self) -> Arc<dyn TokenValidator> {
        self.validator.clone()
    }

    /// Assignment operations on memberships.
    #[must_use]
    pub fn memberships(&self) -> &SeaMembershipRepository {
        &self.memberships
    }

    #[must_use]
    pub fn users(&self) -> &SeaUserRepository {
        &self.users
    }

    #[must_use]
    pub fn tokens(&self) -> &InMemoryTokenStore {
        &self.tokens
    }
}
