//! Directory server configuration and status models.

use serde::{Deserialize, Serialize};

use super::RoleMappingRule;

/// Directory attribute names used to populate an [`ExternalUserRecord`].
///
/// [`ExternalUserRecord`]: super::ExternalUserRecord
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AttributeMapping {
    #[serde(default = "default_name_attr")]
    pub name: String,
    #[serde(default = "default_surname_attr")]
    pub surname: String,
    #[serde(default = "default_username_attr")]
    pub username: String,
    #[serde(default = "default_email_attr")]
    pub email: String,
    #[serde(default = "default_member_of_attr")]
    pub member_of: String,
}

impl Default for AttributeMapping {
    fn default() -> Self {
        Self {
            name: default_name_attr(),
            surname: default_surname_attr(),
            username: default_username_attr(),
            email: default_email_attr(),
            member_of: default_member_of_attr(),
        }
    }
}

fn default_name_attr() -> String {
    "givenName".to_string()
}
fn default_surname_attr() -> String {
    "sn".to_string()
}
fn default_username_attr() -> String {
    "cn".to_string()
}
fn default_email_attr() -> String {
    "email".to_string()
}
fn default_member_of_attr() -> String {
    "memberOf".to_string()
}

/// Connection and mapping settings for one directory server.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DirectoryServerConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Connect with LDAPS.
    #[serde(default)]
    pub use_ssl: bool,

    /// Upgrade a plain connection with STARTTLS.
    #[serde(default)]
    pub start_tls: bool,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub skip_verify: bool,

    /// Connect and operation timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bind DN; `%s` is replaced with the looked up username.
    #[serde(default)]
    pub bind_dn: String,

    #[serde(default, skip_serializing)]
    pub bind_password: String,

    /// User search filter; `%s` is replaced with the escaped username.
    #[serde(default = "default_search_filter")]
    pub search_filter: String,

    pub search_base_dns: Vec<String>,

    /// Group search filter for directories without a member-of attribute.
    /// `%s` is replaced with the value of `group_search_filter_user_attribute`.
    #[serde(default)]
    pub group_search_filter: String,

    #[serde(default)]
    pub group_search_filter_user_attribute: String,

    #[serde(default)]
    pub group_search_base_dns: Vec<String>,

    #[serde(default)]
    pub attributes: AttributeMapping,

    /// Ordered role mapping rules.
    #[serde(default)]
    pub group_mappings: Vec<RoleMappingRule>,
}

impl std::fmt::Debug for DirectoryServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_ssl", &self.use_ssl)
            .field("start_tls", &self.start_tls)
            .field("skip_verify", &self.skip_verify)
            .field("timeout_secs", &self.timeout_secs)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &"***REDACTED***")
            .field("search_filter", &self.search_filter)
            .field("search_base_dns", &self.search_base_dns)
            .field("group_search_filter", &self.group_search_filter)
            .field("group_search_base_dns", &self.group_search_base_dns)
            .field("attributes", &self.attributes)
            .field("group_mappings", &self.group_mappings)
            .finish()
    }
}

fn default_port() -> u16 {
    389
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_search_filter() -> String {
    "(cn=%s)".to_string()
}

impl DirectoryServerConfig {
    /// Minimal configuration for a server; remaining fields take their defaults.
    pub fn new(host: impl Into<String>, search_base_dns: Vec<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            use_ssl: false,
            start_tls: false,
            skip_verify: false,
            timeout_secs: default_timeout_secs(),
            bind_dn: String::new(),
            bind_password: String::new(),
            search_filter: default_search_filter(),
            search_base_dns,
            group_search_filter: String::new(),
            group_search_filter_user_attribute: String::new(),
            group_search_base_dns: Vec::new(),
            attributes: AttributeMapping::default(),
            group_mappings: Vec::new(),
        }
    }

    /// Connection URL for this server.
    pub fn url(&self) -> String {
        let scheme = if self.use_ssl { "ldaps" } else { "ldap" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Health of one configured directory server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerStatus {
    pub host: String,
    pub port: u16,
    pub available: bool,
    pub error: Option<String>,
}
