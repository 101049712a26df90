//! Organization and team summaries used during reconciliation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization as returned by a batch id lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
}

/// Team membership granted through a directory group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembership {
    pub team_id: Uuid,
    pub team_name: String,
    pub org_id: Uuid,
    pub org_name: String,
    #[serde(rename = "groupDN")]
    pub group_dn: String,
}
