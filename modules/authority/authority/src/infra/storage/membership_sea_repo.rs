//! Membership lookups and assignment writes.
//!
//! The join tables are authoritative. Each assignment call replaces one
//! relation wholesale inside a transaction and then refreshes the matching
//! single-valued column on the membership row.

use async_trait::async_trait;
use authority_sdk::MembershipIds;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::repo::MembershipReader;
use crate::infra::storage::entity::{
    MembershipStatus, membership, membership_org_unit, membership_position, membership_role,
};
use crate::infra::storage::mapper::{ids_to_u32, to_u32};

/// Window and audit data applied to one assignment call.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    /// Defaults to the time of the call.
    pub start_at: Option<OffsetDateTime>,
    pub end_at: Option<OffsetDateTime>,
    pub assigned_by: Option<u32>,
    /// Marks one of the assigned ids as primary.
    pub primary_id: Option<u32>,
}

/// Single-valued mirror of an assigned set: the lone id, else the primary one.
fn fast_path(ids: &[u32], primary_id: Option<u32>) -> Option<u32> {
    match ids {
        [only] => Some(*only),
        _ => primary_id.filter(|p| ids.contains(p)),
    }
}

fn is_primary(id: u32, ids: &[u32], primary_id: Option<u32>) -> bool {
    fast_path(ids, primary_id) == Some(id)
}

/// Order-preserving dedup, keeping the unique index satisfied.
fn dedup(ids: &[u32]) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

fn not_ended(col: impl ColumnTrait, now: OffsetDateTime) -> Condition {
    Condition::any().add(col.is_null()).add(col.gt(now))
}

#[derive(Clone)]
pub struct SeaMembershipRepository {
    db: DatabaseConnection,
}

impl SeaMembershipRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_membership<C: sea_orm::ConnectionTrait>(
        conn: &C,
        user_id: u32,
        tenant_id: u32,
    ) -> Result<membership::Model, DomainError> {
        membership::Entity::find()
            .filter(membership::Column::TenantId.eq(i64::from(tenant_id)))
            .filter(membership::Column::UserId.eq(i64::from(user_id)))
            .one(conn)
            .await?
            .ok_or_else(|| DomainError::membership_not_found(user_id, tenant_id))
    }

    /// Create or replace the membership of `user_id` in `tenant_id`.
    ///
    /// Returns the membership id.
    ///
    /// # Errors
    /// Database failures.
    pub async fn assign_tenant(
        &self,
        user_id: u32,
        tenant_id: u32,
        assignment: &Assignment,
    ) -> Result<u32, DomainError> {
        let now = OffsetDateTime::now_utc();
        let txn = self.db.begin().await?;

        let existing = membership::Entity::find()
            .filter(membership::Column::TenantId.eq(i64::from(tenant_id)))
            .filter(membership::Column::UserId.eq(i64::from(user_id)))
            .one(&txn)
            .await?;

        let saved = if let Some(model) = existing {
            let mut am: membership::ActiveModel = model.into();
            am.status = Set(MembershipStatus::Active);
            am.is_primary = Set(true);
            am.start_at = Set(Some(assignment.start_at.unwrap_or(now)));
            am.end_at = Set(assignment.end_at);
            am.assigned_at = Set(Some(now));
            am.assigned_by = Set(assignment.assigned_by.map(i64::from));
            am.update(&txn).await?
        } else {
            membership::ActiveModel {
                tenant_id: Set(i64::from(tenant_id)),
                user_id: Set(i64::from(user_id)),
                is_primary: Set(true),
                status: Set(MembershipStatus::Active),
                start_at: Set(Some(assignment.start_at.unwrap_or(now))),
                end_at: Set(assignment.end_at),
                assigned_at: Set(Some(now)),
                assigned_by: Set(assignment.assigned_by.map(i64::from)),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        };

        txn.commit().await?;
        debug!(user_id, tenant_id, membership_id = saved.id, "tenant assigned");
        to_u32("memberships.id", saved.id)
    }

    /// Replace the role set of the membership.
    ///
    /// # Errors
    /// [`DomainError::MembershipNotFound`] or database failures.
    pub async fn assign_roles(
        &self,
        user_id: u32,
        tenant_id: u32,
        role_ids: &[u32],
        assignment: &Assignment,
    ) -> Result<(), DomainError> {
        let ids = dedup(role_ids);
        let now = OffsetDateTime::now_utc();
        let txn = self.db.begin().await?;
        let m = Self::find_membership(&txn, user_id, tenant_id).await?;

        membership_role::Entity::delete_many()
            .filter(membership_role::Column::TenantId.eq(m.tenant_id))
            .filter(membership_role::Column::MembershipId.eq(m.id))
            .exec(&txn)
            .await?;

        let rows: Vec<membership_role::ActiveModel> = ids
            .iter()
            .map(|&id| membership_role::ActiveModel {
                tenant_id: Set(m.tenant_id),
                membership_id: Set(m.id),
                role_id: Set(i64::from(id)),
                is_primary: Set(is_primary(id, &ids, assignment.primary_id)),
                start_at: Set(Some(assignment.start_at.unwrap_or(now))),
                end_at: Set(assignment.end_at),
                assigned_at: Set(Some(now)),
                assigned_by: Set(assignment.assigned_by.map(i64::from)),
                ..Default::default()
            })
            .collect();
        if !rows.is_empty() {
            membership_role::Entity::insert_many(rows).exec(&txn).await?;
        }

        Self::set_fast_path(
            &txn,
            m.id,
            membership::Column::RoleId,
            fast_path(&ids, assignment.primary_id),
        )
        .await?;
        txn.commit().await?;
        debug!(user_id, tenant_id, count = ids.len(), "roles assigned");
        Ok(())
    }

    /// Replace the position set of the membership.
    ///
    /// # Errors
    /// [`DomainError::MembershipNotFound`] or database failures.
    pub async fn assign_positions(
        &self,
        user_id: u32,
        tenant_id: u32,
        position_ids: &[u32],
        assignment: &Assignment,
    ) -> Result<(), DomainError> {
        let ids = dedup(position_ids);
        let now = OffsetDateTime::now_utc();
        let txn = self.db.begin().await?;
        let m = Self::find_membership(&txn, user_id, tenant_id).await?;

        membership_position::Entity::delete_many()
            .filter(membership_position::Column::TenantId.eq(m.tenant_id))
            .filter(membership_position::Column::MembershipId.eq(m.id))
            .exec(&txn)
            .await?;

        let rows: Vec<membership_position::ActiveModel> = ids
            .iter()
            .map(|&id| membership_position::ActiveModel {
                tenant_id: Set(m.tenant_id),
                membership_id: Set(m.id),
                position_id: Set(i64::from(id)),
                is_primary: Set(is_primary(id, &ids, assignment.primary_id)),
                start_at: Set(Some(assignment.start_at.unwrap_or(now))),
                end_at: Set(assignment.end_at),
                assigned_at: Set(Some(now)),
                assigned_by: Set(assignment.assigned_by.map(i64::from)),
                ..Default::default()
            })
            .collect();
        if !rows.is_empty() {
            membership_position::Entity::insert_many(rows)
                .exec(&txn)
                .await?;
        }

        Self::set_fast_path(
            &txn,
            m.id,
            membership::Column::PositionId,
            fast_path(&ids, assignment.primary_id),
        )
        .await?;
        txn.commit().await?;
        debug!(user_id, tenant_id, count = ids.len(), "positions assigned");
        Ok(())
    }

    /// Replace the org-unit set of the membership.
    ///
    /// # Errors
    /// [`DomainError::MembershipNotFound`] or database failures.
    pub async fn assign_org_units(
        &self,
        user_id: u32,
        tenant_id: u32,
        org_unit_ids: &[u32],
        assignment: &Assignment,
    ) -> Result<(), DomainError> {
        let ids = dedup(org_unit_ids);
        let now = OffsetDateTime::now_utc();
        let txn = self.db.begin().await?;
        let m = Self::find_membership(&txn, user_id, tenant_id).await?;

        membership_org_unit::Entity::delete_many()
            .filter(membership_org_unit::Column::TenantId.eq(m.tenant_id))
            .filter(membership_org_unit::Column::MembershipId.eq(m.id))
            .exec(&txn)
            .await?;

        let rows: Vec<membership_org_unit::ActiveModel> = ids
            .iter()
            .map(|&id| membership_org_unit::ActiveModel {
                tenant_id: Set(m.tenant_id),
                membership_id: Set(m.id),
                org_unit_id: Set(i64::from(id)),
                is_primary: Set(is_primary(id, &ids, assignment.primary_id)),
                start_at: Set(Some(assignment.start_at.unwrap_or(now))),
                end_at: Set(assignment.end_at),
                assigned_at: Set(Some(now)),
                assigned_by: Set(assignment.assigned_by.map(i64::from)),
                ..Default::default()
            })
            .collect();
        if !rows.is_empty() {
            membership_org_unit::Entity::insert_many(rows)
                .exec(&txn)
                .await?;
        }

        Self::set_fast_path(
            &txn,
            m.id,
            membership::Column::OrgUnitId,
            fast_path(&ids, assignment.primary_id),
        )
        .await?;
        txn.commit().await?;
        debug!(user_id, tenant_id, count = ids.len(), "org units assigned");
        Ok(())
    }

    async fn set_fast_path(
        txn: &DatabaseTransaction,
        membership_id: i64,
        column: membership::Column,
        value: Option<u32>,
    ) -> Result<(), DomainError> {
        membership::Entity::update_many()
            .col_expr(column, Expr::value(value.map(i64::from)))
            .filter(membership::Column::Id.eq(membership_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    /// # Errors
    /// [`DomainError::MembershipNotFound`] or database failures.
    pub async fn set_status(
        &self,
        user_id: u32,
        tenant_id: u32,
        status: MembershipStatus,
    ) -> Result<(), DomainError> {
        let res = membership::Entity::update_many()
            .col_expr(membership::Column::Status, Expr::value(status))
            .filter(membership::Column::TenantId.eq(i64::from(tenant_id)))
            .filter(membership::Column::UserId.eq(i64::from(user_id)))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::membership_not_found(user_id, tenant_id));
        }
        Ok(())
    }

    /// Close (or, with `None`, reopen) the membership window.
    ///
    /// # Errors
    /// [`DomainError::MembershipNotFound`] or database failures.
    pub async fn set_end_at(
        &self,
        user_id: u32,
        tenant_id: u32,
        end_at: Option<OffsetDateTime>,
    ) -> Result<(), DomainError> {
        let res = membership::Entity::update_many()
            .col_expr(membership::Column::EndAt, Expr::value(end_at))
            .filter(membership::Column::TenantId.eq(i64::from(tenant_id)))
            .filter(membership::Column::UserId.eq(i64::from(user_id)))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::membership_not_found(user_id, tenant_id));
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipReader for SeaMembershipRepository {
    async fn list_membership_all_ids(
        &self,
        user_id: u32,
        tenant_id: u32,
    ) -> Result<MembershipIds, DomainError> {
        // Only `end_at` bounds the window; `start_at` is not consulted.
        let now = OffsetDateTime::now_utc();
        let m = membership::Entity::find()
            .filter(membership::Column::TenantId.eq(i64::from(tenant_id)))
            .filter(membership::Column::UserId.eq(i64::from(user_id)))
            .filter(not_ended(membership::Column::EndAt, now))
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::membership_not_found(user_id, tenant_id))?;

        let roles = membership_role::Entity::find()
            .select_only()
            .column(membership_role::Column::RoleId)
            .filter(membership_role::Column::TenantId.eq(m.tenant_id))
            .filter(membership_role::Column::MembershipId.eq(m.id))
            .filter(not_ended(membership_role::Column::EndAt, now))
            .into_tuple::<i64>()
            .all(&self.db);
        let positions = membership_position::Entity::find()
            .select_only()
            .column(membership_position::Column::PositionId)
            .filter(membership_position::Column::TenantId.eq(m.tenant_id))
            .filter(membership_position::Column::MembershipId.eq(m.id))
            .filter(not_ended(membership_position::Column::EndAt, now))
            .into_tuple::<i64>()
            .all(&self.db);
        let org_units = membership_org_unit::Entity::find()
            .select_only()
            .column(membership_org_unit::Column::OrgUnitId)
            .filter(membership_org_unit::Column::TenantId.eq(m.tenant_id))
            .filter(membership_org_unit::Column::MembershipId.eq(m.id))
            .filter(not_ended(membership_org_unit::Column::EndAt, now))
            .into_tuple::<i64>()
            .all(&self.db);

        let (roles, positions, org_units) = tokio::try_join!(roles, positions, org_units)?;

        Ok(MembershipIds {
            role_ids: ids_to_u32("membership_roles.role_id", roles)?,
            position_ids: ids_to_u32("membership_positions.position_id", positions)?,
            org_unit_ids: ids_to_u32("membership_org_units.org_unit_id", org_units)?,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn fast_path_mirrors_single_or_primary() {
        assert_eq!(fast_path(&[7], None), Some(7));
        assert_eq!(fast_path(&[7], Some(9)), Some(7));
        assert_eq!(fast_path(&[7, 8], None), None);
        assert_eq!(fast_path(&[7, 8], Some(8)), Some(8));
        assert_eq!(fast_path(&[7, 8], Some(9)), None);
        assert_eq!(fast_path(&[], Some(9)), None);
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
