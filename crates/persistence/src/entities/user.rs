//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::OrgRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for org_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "org_role", rename_all = "lowercase")]
pub enum OrgRoleDb {
    Viewer,
    Editor,
    Admin,
}

impl From<OrgRole> for OrgRoleDb {
    fn from(role: OrgRole) -> Self {
        match role {
            OrgRole::Viewer => Self::Viewer,
            OrgRole::Editor => Self::Editor,
            OrgRole::Admin => Self::Admin,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub login: String,
    pub email: String,
    pub name: String,
    pub auth_module: Option<String>,
    pub auth_id: Option<String>,
    pub is_admin: bool,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            login: entity.login,
            email: entity.email,
            name: entity.name,
            auth_module: entity.auth_module,
            is_admin: entity.is_admin,
            is_disabled: entity.is_disabled,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
