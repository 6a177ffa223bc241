use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => {
                r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    username VARCHAR(255) NOT NULL,
    password_hash TEXT NOT NULL,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    created_at TIMESTAMPTZ NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(username);

CREATE TABLE IF NOT EXISTS roles (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    code VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    data_scope VARCHAR(255) NOT NULL,
    role_type VARCHAR(255) NOT NULL,
    is_platform_admin BOOLEAN NOT NULL DEFAULT FALSE,
    is_tenant_admin BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE IF NOT EXISTS org_units (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    name VARCHAR(255) NOT NULL,
    path VARCHAR(255) NOT NULL
);

CREATE TABLE IF NOT EXISTS memberships (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    user_id BIGINT NOT NULL,
    org_unit_id BIGINT NULL,
    position_id BIGINT NULL,
    role_id BIGINT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMPTZ NULL,
    end_at TIMESTAMPTZ NULL,
    assigned_at TIMESTAMPTZ NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_memberships_tenant_user ON memberships(tenant_id, user_id);

CREATE TABLE IF NOT EXISTS membership_roles (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    role_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMPTZ NULL,
    end_at TIMESTAMPTZ NULL,
    assigned_at TIMESTAMPTZ NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_membership_roles_target ON membership_roles(tenant_id, membership_id, role_id);

CREATE TABLE IF NOT EXISTS membership_positions (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    position_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMPTZ NULL,
    end_at TIMESTAMPTZ NULL,
    assigned_at TIMESTAMPTZ NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_membership_positions_target ON membership_positions(tenant_id, membership_id, position_id);

CREATE TABLE IF NOT EXISTS membership_org_units (
    id BIGSERIAL PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    org_unit_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMPTZ NULL,
    end_at TIMESTAMPTZ NULL,
    assigned_at TIMESTAMPTZ NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_membership_org_units_target ON membership_org_units(tenant_id, membership_id, org_unit_id);
                "#
            }
            sea_orm::DatabaseBackend::MySql => {
                r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    username VARCHAR(255) NOT NULL,
    password_hash TEXT NOT NULL,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    created_at TIMESTAMP NOT NULL,
    UNIQUE KEY idx_users_username (username)
);

CREATE TABLE IF NOT EXISTS roles (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    code VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    data_scope VARCHAR(255) NOT NULL,
    role_type VARCHAR(255) NOT NULL,
    is_platform_admin BOOLEAN NOT NULL DEFAULT FALSE,
    is_tenant_admin BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE IF NOT EXISTS org_units (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    name VARCHAR(255) NOT NULL,
    path VARCHAR(255) NOT NULL
);

CREATE TABLE IF NOT EXISTS memberships (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    user_id BIGINT NOT NULL,
    org_unit_id BIGINT NULL,
    position_id BIGINT NULL,
    role_id BIGINT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMP NULL,
    end_at TIMESTAMP NULL,
    assigned_at TIMESTAMP NULL,
    assigned_by BIGINT NULL,
    UNIQUE KEY idx_memberships_tenant_user (tenant_id, user_id)
);

CREATE TABLE IF NOT EXISTS membership_roles (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    role_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMP NULL,
    end_at TIMESTAMP NULL,
    assigned_at TIMESTAMP NULL,
    assigned_by BIGINT NULL,
    UNIQUE KEY idx_membership_roles_target (tenant_id, membership_id, role_id)
);

CREATE TABLE IF NOT EXISTS membership_positions (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    position_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMP NULL,
    end_at TIMESTAMP NULL,
    assigned_at TIMESTAMP NULL,
    assigned_by BIGINT NULL,
    UNIQUE KEY idx_membership_positions_target (tenant_id, membership_id, position_id)
);

CREATE TABLE IF NOT EXISTS membership_org_units (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    org_unit_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status VARCHAR(255) NOT NULL DEFAULT 'ACTIVE',
    start_at TIMESTAMP NULL,
    end_at TIMESTAMP NULL,
    assigned_at TIMESTAMP NULL,
    assigned_by BIGINT NULL,
    UNIQUE KEY idx_membership_org_units_target (tenant_id, membership_id, org_unit_id)
);
                "#
            }
            sea_orm::DatabaseBackend::Sqlite => {
                r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id BIGINT NOT NULL,
    username TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(username);

CREATE TABLE IF NOT EXISTS roles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id BIGINT NOT NULL,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    data_scope TEXT NOT NULL,
    role_type TEXT NOT NULL,
    is_platform_admin BOOLEAN NOT NULL DEFAULT FALSE,
    is_tenant_admin BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE IF NOT EXISTS org_units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id BIGINT NOT NULL,
    name TEXT NOT NULL,
    path TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS memberships (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id BIGINT NOT NULL,
    user_id BIGINT NOT NULL,
    org_unit_id BIGINT NULL,
    position_id BIGINT NULL,
    role_id BIGINT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    start_at TEXT NULL,
    end_at TEXT NULL,
    assigned_at TEXT NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_memberships_tenant_user ON memberships(tenant_id, user_id);

CREATE TABLE IF NOT EXISTS membership_roles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    role_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    start_at TEXT NULL,
    end_at TEXT NULL,
    assigned_at TEXT NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_membership_roles_target ON membership_roles(tenant_id, membership_id, role_id);

CREATE TABLE IF NOT EXISTS membership_positions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    position_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    start_at TEXT NULL,
    end_at TEXT NULL,
    assigned_at TEXT NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_membership_positions_target ON membership_positions(tenant_id, membership_id, position_id);

CREATE TABLE IF NOT EXISTS membership_org_units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id BIGINT NOT NULL,
    membership_id BIGINT NOT NULL,
    org_unit_id BIGINT NOT NULL,
    is_primary BOOLEAN NOT NULL DEFAULT FALSE,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    start_at TEXT NULL,
    end_at TEXT NULL,
    assigned_at TEXT NULL,
    assigned_by BIGINT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_membership_org_units_target ON membership_org_units(tenant_id, membership_id, org_unit_id);
                "#
            }
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let sql = r#"
DROP TABLE IF EXISTS membership_org_units;
DROP TABLE IF EXISTS membership_positions;
DROP TABLE IF EXISTS membership_roles;
DROP TABLE IF EXISTS memberships;
DROP TABLE IF EXISTS org_units;
DROP TABLE IF EXISTS roles;
DROP TABLE IF EXISTS users;
        "#;
        conn.execute_unprepared(sql).await?;
        Ok(())
    }
}
