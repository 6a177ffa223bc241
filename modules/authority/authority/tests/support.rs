#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `authority` integration tests.
//!
//! Provides an in-memory database with migrations applied, seeding helpers
//! and a fully wired module.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use authority::infra::storage::Assignment;
use authority::infra::storage::entity::{org_unit, role};
use authority::{AuthorityConfig, AuthorityModule};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use secrecy::SecretString;
use tessera_auth::{AuthConfig, JwtTokenService};

pub const SECRET: &str = "authority-tests-secret-authority-tests";
pub const PASSWORD: &str = "s3cret-pass";

/// Create a fresh in-memory `SQLite` database with migrations applied.
///
/// # Panics
/// Panics if the database connection or migrations fail.
pub async fn inmem_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    AuthorityModule::migrate(&db)
        .await
        .expect("Failed to run migrations");

    db
}

#[must_use]
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        secret: SecretString::from(SECRET.to_owned()),
        ..AuthConfig::default()
    }
}

/// Token service sharing the module's key, for decoding issued tokens.
#[must_use]
pub fn jwt() -> JwtTokenService {
    JwtTokenService::new(&auth_config()).expect("valid auth config")
}

pub fn module(db: &DatabaseConnection) -> AuthorityModule {
    AuthorityModule::new(db, &auth_config(), &AuthorityConfig::default()).expect("module wiring")
}

pub async fn seed_role(
    db: &DatabaseConnection,
    tenant_id: u32,
    code: &str,
    data_scope: &str,
    role_type: &str,
) -> u32 {
    let model = role::ActiveModel {
        tenant_id: Set(i64::from(tenant_id)),
        code: Set(code.to_owned()),
        name: Set(code.to_owned()),
        data_scope: Set(data_scope.to_owned()),
        role_type: Set(role_type.to_owned()),
        is_platform_admin: Set(false),
        is_tenant_admin: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed role");
    u32::try_from(model.id).unwrap()
}

/// Seed a role carrying an explicit tenant-admin flag.
pub async fn seed_flagged_tenant_admin(
    db: &DatabaseConnection,
    tenant_id: u32,
    data_scope: &str,
) -> u32 {
    let model = role::ActiveModel {
        tenant_id: Set(i64::from(tenant_id)),
        code: Set("ops".to_owned()),
        name: Set("Operations".to_owned()),
        data_scope: Set(data_scope.to_owned()),
        role_type: Set("CUSTOM".to_owned()),
        is_platform_admin: Set(false),
        is_tenant_admin: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed role");
    u32::try_from(model.id).unwrap()
}

pub async fn seed_org_unit(db: &DatabaseConnection, tenant_id: u32, path: &str) -> u32 {
    let model = org_unit::ActiveModel {
        tenant_id: Set(i64::from(tenant_id)),
        name: Set(path.to_owned()),
        path: Set(path.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed org unit");
    u32::try_from(model.id).unwrap()
}

/// Create a user with [`PASSWORD`] and a membership in its tenant.
pub async fn seed_member(module: &AuthorityModule, tenant_id: u32, username: &str) -> u32 {
    let user = module
        .users()
        .create_user(tenant_id, username, PASSWORD)
        .await
        .expect("Failed to create user");
    module
        .memberships()
        .assign_tenant(user.id, tenant_id, &Assignment::default())
        .await
        .expect("Failed to assign tenant");
    user.id
}

/// Seed a member holding the given roles.
pub async fn seed_member_with_roles(
    module: &AuthorityModule,
    tenant_id: u32,
    username: &str,
    role_ids: &[u32],
) -> u32 {
    let user_id = seed_member(module, tenant_id, username).await;
    module
        .memberships()
        .assign_roles(user_id, tenant_id, role_ids, &Assignment::default())
        .await
        .expect("Failed to assign roles");
    user_id
}
