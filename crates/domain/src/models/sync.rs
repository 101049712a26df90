//! User sync decision models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExternalUserRecord;

/// Action taken for one internal user after looking it up in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDecision {
    /// The user left the directory: deactivate the account.
    Disable,
    /// The user is present: merge the fetched attributes.
    Upsert,
    /// Disabling would lock out the super admin.
    Refuse,
}

impl std::fmt::Display for SyncDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncDecision::Disable => write!(f, "disable"),
            SyncDecision::Upsert => write!(f, "upsert"),
            SyncDecision::Refuse => write!(f, "refuse"),
        }
    }
}

/// Result of a directory lookup that the sync decision can act on.
///
/// Lookup failures other than "user not found" never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryLookup {
    Found(ExternalUserRecord),
    Absent,
}

/// Settings steering the sync path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Login of the super administrator, never disabled by a sync.
    pub admin_login: String,
    /// Whether the sync path may create users unknown to the store.
    pub allow_signup: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            admin_login: "admin".to_string(),
            allow_signup: true,
        }
    }
}

/// Outcome of a completed sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncOutcome {
    pub user_id: Uuid,
    pub login: String,
    pub decision: SyncDecision,
}

impl SyncOutcome {
    /// Operator-facing summary of what happened.
    pub fn message(&self) -> &'static str {
        match self.decision {
            SyncDecision::Upsert => "user synced",
            SyncDecision::Disable => "User disabled without any updates in the information",
            SyncDecision::Refuse => "user left untouched",
        }
    }
}
