//! Team entities (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// One team reached through a directory group, joined with its organization.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMembershipEntity {
    pub team_id: Uuid,
    pub team_name: String,
    pub org_id: Uuid,
    pub org_name: String,
    pub group_dn: String,
}

impl From<TeamMembershipEntity> for domain::models::TeamMembership {
    fn from(entity: TeamMembershipEntity) -> Self {
        Self {
            team_id: entity.team_id,
            team_name: entity.team_name,
            org_id: entity.org_id,
            org_name: entity.org_name,
            group_dn: entity.group_dn,
        }
    }
}
