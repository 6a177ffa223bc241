use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use super::status::MembershipOrgUnitStatus;

/// Unique on (`tenant_id`, `membership_id`, `org_unit_id`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "membership_org_units")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub membership_id: i64,
    pub org_unit_id: i64,
    pub is_primary: bool,
    pub status: MembershipOrgUnitStatus,
    pub start_at: Option<OffsetDateTime>,
    pub end_at: Option<OffsetDateTime>,
    pub assigned_at: Option<OffsetDateTime>,
    pub assigned_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::membership::Entity",
        from = "Column::MembershipId",
        to = "super::membership::Column::Id"
    )]
    Membership,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}
