//! Role mapping rules and the assignments derived from them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OrgRole;

/// Group identifier that matches every directory user.
pub const WILDCARD_GROUP: &str = "*";

/// Binds one directory group to an (organization, role) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoleMappingRule {
    pub group_dn: String,
    pub org_id: Uuid,
    pub org_role: OrgRole,
    /// Grants (or explicitly withholds) instance administrator rights.
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl RoleMappingRule {
    pub fn new(group_dn: impl Into<String>, org_id: Uuid, org_role: OrgRole) -> Self {
        Self {
            group_dn: group_dn.into(),
            org_id,
            org_role,
            is_admin: None,
        }
    }

    /// Whether a user with these directory groups satisfies this rule.
    ///
    /// Group DNs compare case-insensitively. [`WILDCARD_GROUP`] matches every
    /// user, including one without any group.
    pub fn matches_groups(&self, groups: &[String]) -> bool {
        self.group_dn == WILDCARD_GROUP
            || groups.iter().any(|g| self.group_dn.eq_ignore_ascii_case(g))
    }
}

/// One evaluated mapping rule, as shown in the debug view.
///
/// `org_role` is `None` when the user did not satisfy the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRoleAssignment {
    #[serde(rename = "orgId")]
    pub org_id: Uuid,
    #[serde(rename = "orgName")]
    pub org_name: String,
    #[serde(rename = "orgRole")]
    pub org_role: Option<OrgRole>,
    #[serde(rename = "groupDN")]
    pub group_dn: String,
}

impl OrgRoleAssignment {
    pub fn is_matched(&self) -> bool {
        self.org_role.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matches_groups_case_insensitive() {
        let rule = RoleMappingRule::new("cn=Admins,dc=example,dc=org", Uuid::nil(), OrgRole::Admin);
        assert!(rule.matches_groups(&groups(&[
            "cn=users,dc=example,dc=org",
            "CN=admins,DC=example,DC=org",
        ])));
        assert!(!rule.matches_groups(&groups(&["cn=users,dc=example,dc=org"])));
        assert!(!rule.matches_groups(&[]));
    }

    #[test]
    fn test_wildcard_matches_everyone() {
        let rule = RoleMappingRule::new(WILDCARD_GROUP, Uuid::nil(), OrgRole::Viewer);
        assert!(rule.matches_groups(&groups(&["cn=anything"])));
        assert!(rule.matches_groups(&[]));
    }

    #[test]
    fn test_assignment_serializes_with_display_names() {
        let assignment = OrgRoleAssignment {
            org_id: Uuid::nil(),
            org_name: "Main Org.".to_string(),
            org_role: None,
            group_dn: "cn=users".to_string(),
        };
        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["orgName"], "Main Org.");
        assert_eq!(json["groupDN"], "cn=users");
        assert!(json["orgRole"].is_null());
    }

    #[test]
    fn test_rule_deserializes_without_admin_flag() {
        let rule: RoleMappingRule = serde_json::from_value(serde_json::json!({
            "group_dn": "cn=editors",
            "org_id": Uuid::nil(),
            "org_role": "editor"
        }))
        .unwrap();
        assert_eq!(rule.org_role, OrgRole::Editor);
        assert_eq!(rule.is_admin, None);
    }
}
