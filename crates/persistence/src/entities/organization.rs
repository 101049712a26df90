//! Organization entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the organizations table.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationEntity {
    pub id: Uuid,
    pub name: String,
}

impl From<OrganizationEntity> for domain::models::Organization {
    fn from(entity: OrganizationEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}
