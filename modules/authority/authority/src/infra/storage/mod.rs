//! Infrastructure storage layer - SeaORM persistence.
//!
//! ## Architecture
//!
//! This module contains ALL SeaORM-specific code and database operations:
//! - `entity/` - entity definitions (users, roles, org units, memberships and their join tables)
//! - `mapper.rs` - conversions between SeaORM models and SDK contract types
//! - `migrations/` - database schema migrations
//! - `*_sea_repo.rs` - implementations of the domain ports
//!
//! Ids are `BIGINT` in the database and `u32` in the domain; the mapper
//! rejects rows that do not fit.

pub mod entity;
pub mod mapper;
pub mod migrations;

mod membership_sea_repo;
mod org_unit_sea_repo;
mod role_sea_repo;
mod user_sea_repo;

pub use membership_sea_repo::{Assignment, SeaMembershipRepository};
pub use org_unit_sea_repo::SeaOrgUnitRepository;
pub use role_sea_repo::SeaRoleRepository;
pub use user_sea_repo::SeaUserRepository;
