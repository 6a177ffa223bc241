pub mod membership;
pub mod membership_org_unit;
pub mod membership_position;
pub mod membership_role;
pub mod org_unit;
pub mod role;
pub mod status;
pub mod user;

pub use status::{
    MembershipOrgUnitStatus, MembershipPositionStatus, MembershipRoleStatus, MembershipStatus,
};
