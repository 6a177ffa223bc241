use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use super::status::MembershipStatus;

/// One user in one tenant. Unique on (`tenant_id`, `user_id`).
///
/// `role_id`, `position_id` and `org_unit_id` mirror the join tables when
/// exactly one (or one primary) assignment exists.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub user_id: i64,
    pub org_unit_id: Option<i64>,
    pub position_id: Option<i64>,
    pub role_id: Option<i64>,
    pub is_primary: bool,
    pub status: MembershipStatus,
    pub start_at: Option<OffsetDateTime>,
    pub end_at: Option<OffsetDateTime>,
    pub assigned_at: Option<OffsetDateTime>,
    pub assigned_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::membership_role::Entity")]
    Roles,
    #[sea_orm(has_many = "super::membership_position::Entity")]
    Positions,
    #[sea_orm(has_many = "super::membership_org_unit::Entity")]
    OrgUnits,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::membership_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl Related<super::membership_position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Positions.def()
    }
}

impl Related<super::membership_org_unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrgUnits.def()
    }
}
