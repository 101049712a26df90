//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod organization;
pub mod team;
pub mod user;

pub use organization::OrganizationEntity;
pub use team::TeamMembershipEntity;
pub use user::{OrgRoleDb, UserEntity};
