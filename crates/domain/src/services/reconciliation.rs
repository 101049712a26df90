//! Group-to-role reconciliation.
//!
//! Evaluates every configured mapping rule against one directory user and
//! fills in organization names for the resulting assignments.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::error::ReconcileError;
use crate::models::{ExternalUserRecord, OrgRoleAssignment, RoleMappingRule};
use crate::services::stores::OrgStore;

/// Whether the user holds exactly the role the rule grants in the rule's organization.
///
/// Users carry at most one role per organization, so this is a single comparison.
pub fn is_match(user: &ExternalUserRecord, rule: &RoleMappingRule) -> bool {
    user.role_in(rule.org_id) == Some(rule.org_role)
}

/// One assignment per rule, in rule order.
///
/// Unmatched rules still produce an entry with no role so callers can show
/// which rules were evaluated.
pub fn compute_org_roles(
    user: &ExternalUserRecord,
    rules: &[RoleMappingRule],
) -> Vec<OrgRoleAssignment> {
    rules
        .iter()
        .map(|rule| OrgRoleAssignment {
            org_id: rule.org_id,
            org_name: String::new(),
            org_role: is_match(user, rule).then_some(rule.org_role),
            group_dn: rule.group_dn.clone(),
        })
        .collect()
}

/// Fill in `org_name` for every assignment with a single store round trip.
///
/// All ids are validated before any assignment is touched: on error the
/// slice is left exactly as it was.
pub async fn resolve_org_names(
    assignments: &mut [OrgRoleAssignment],
    orgs: &dyn OrgStore,
) -> Result<(), ReconcileError> {
    if assignments.is_empty() {
        return Ok(());
    }

    let mut ids: Vec<Uuid> = Vec::with_capacity(assignments.len());
    for assignment in assignments.iter() {
        if !ids.contains(&assignment.org_id) {
            ids.push(assignment.org_id);
        }
    }

    let names: HashMap<Uuid, String> = orgs
        .search_by_ids(&ids)
        .await?
        .into_iter()
        .map(|org| (org.id, org.name))
        .collect();

    if let Some(missing) = ids.iter().find(|id| !names.contains_key(id)) {
        return Err(ReconcileError::OrganizationNotFound(*missing));
    }

    for assignment in assignments.iter_mut() {
        if let Some(name) = names.get(&assignment.org_id) {
            assignment.org_name = name.clone();
        }
    }

    debug!(
        assignments = assignments.len(),
        organizations = ids.len(),
        "Resolved organization names"
    );

    Ok(())
}
