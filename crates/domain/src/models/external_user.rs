//! External (directory-sourced) user model.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::OrgRole;

/// Auth module tag attached to every user sourced from the LDAP directory.
pub const LDAP_AUTH_MODULE: &str = "ldap";

/// Identity of a user as reported by the directory.
///
/// Built fresh for every lookup and never persisted as-is. `org_roles` holds
/// at most one role per organization; the map type enforces it and the
/// directory client decides which group wins when several match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExternalUserRecord {
    pub auth_module: String,
    /// Directory identifier of the entry (the entry DN for LDAP).
    pub auth_id: String,
    pub login: String,
    pub email: String,
    pub name: String,
    /// `None` when no mapping rule expressed an opinion on admin rights.
    pub is_admin: Option<bool>,
    pub is_disabled: bool,
    pub org_roles: HashMap<Uuid, OrgRole>,
    /// Raw directory group identifiers the user belongs to.
    pub groups: Vec<String>,
}

impl ExternalUserRecord {
    /// Role held in the given organization, if any.
    pub fn role_in(&self, org_id: Uuid) -> Option<OrgRole> {
        self.org_roles.get(&org_id).copied()
    }
}
