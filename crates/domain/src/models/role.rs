//! Organization role model.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role a user holds inside one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum OrgRole {
    Viewer,
    Editor,
    Admin,
}

impl OrgRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::Viewer => "Viewer",
            OrgRole::Editor => "Editor",
            OrgRole::Admin => "Admin",
        }
    }
}

impl FromStr for OrgRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Ok(OrgRole::Viewer),
            "editor" => Ok(OrgRole::Editor),
            "admin" => Ok(OrgRole::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl TryFrom<String> for OrgRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for OrgRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_role_from_str_case_insensitive() {
        assert_eq!("viewer".parse::<OrgRole>().unwrap(), OrgRole::Viewer);
        assert_eq!("Editor".parse::<OrgRole>().unwrap(), OrgRole::Editor);
        assert_eq!(" ADMIN ".parse::<OrgRole>().unwrap(), OrgRole::Admin);
        assert!("owner".parse::<OrgRole>().is_err());
    }

    #[test]
    fn test_org_role_serde() {
        assert_eq!(serde_json::to_string(&OrgRole::Editor).unwrap(), "\"Editor\"");
        let role: OrgRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, OrgRole::Admin);
        assert!(serde_json::from_str::<OrgRole>("\"root\"").is_err());
    }
}
