//! Internal user model as seen by the sync path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExternalUserRecord;

/// Internal user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub email: String,
    pub name: String,
    /// Module the account was last authenticated through, `None` for local accounts.
    pub auth_module: Option<String>,
    pub is_admin: bool,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command merging freshly fetched directory attributes into the user store.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertExternalUser {
    pub external_user: ExternalUserRecord,
    /// Whether a user unknown to the store may be created by this command.
    pub signup_allowed: bool,
}
