//! Derivation of per-organization roles from raw directory group membership.
//!
//! Runs at the directory-client boundary, which is where the one role per
//! organization rule is established.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{OrgRole, RoleMappingRule};

/// Roles and admin flag derived from a user's directory groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedRoles {
    pub org_roles: HashMap<Uuid, OrgRole>,
    pub is_admin: Option<bool>,
    /// Rules are configured but none matched: the user may not sign in.
    pub is_disabled: bool,
}

/// Apply mapping rules in order. The first matching rule per organization wins.
///
/// An admin grant from any matching rule sticks; a later rule cannot revoke it.
pub fn derive_org_roles(groups: &[String], rules: &[RoleMappingRule]) -> DerivedRoles {
    let mut derived = DerivedRoles::default();

    for rule in rules {
        if derived.org_roles.contains_key(&rule.org_id) {
            continue;
        }
        if !rule.matches_groups(groups) {
            continue;
        }

        derived.org_roles.insert(rule.org_id, rule.org_role);
        if derived.is_admin != Some(true) {
            derived.is_admin = rule.is_admin;
        }
    }

    derived.is_disabled = !rules.is_empty() && derived.org_roles.is_empty();
    derived
}
