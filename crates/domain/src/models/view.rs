//! Display records for the directory debug surface.

use serde::{Deserialize, Serialize};

use super::{OrgRoleAssignment, ServerStatus, TeamMembership};

/// A mapped attribute: the configured directory attribute name and the value read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedAttribute {
    #[serde(rename = "cfgAttrValue")]
    pub config_attribute: String,
    #[serde(rename = "ldapValue")]
    pub directory_value: String,
}

impl MappedAttribute {
    pub fn new(config_attribute: impl Into<String>, directory_value: impl Into<String>) -> Self {
        Self {
            config_attribute: config_attribute.into(),
            directory_value: directory_value.into(),
        }
    }
}

/// How one directory user would be mapped when synced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUserView {
    pub name: MappedAttribute,
    pub surname: MappedAttribute,
    pub email: MappedAttribute,
    pub login: MappedAttribute,
    pub is_admin: Option<bool>,
    pub is_disabled: bool,
    pub roles: Vec<OrgRoleAssignment>,
    pub teams: Vec<TeamMembership>,
}

/// Server status as rendered by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatusView {
    pub host: String,
    pub port: u16,
    pub available: bool,
    /// Empty when the server is healthy.
    pub error: String,
}

impl From<ServerStatus> for ServerStatusView {
    fn from(status: ServerStatus) -> Self {
        Self {
            host: status.host,
            port: status.port,
            available: status.available,
            error: status.error.unwrap_or_default(),
        }
    }
}
