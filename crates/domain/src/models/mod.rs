//! Domain models for Identity Sync.

pub mod directory;
pub mod external_user;
pub mod mapping;
pub mod organization;
pub mod role;
pub mod sync;
pub mod user;
pub mod view;

pub use directory::{AttributeMapping, DirectoryServerConfig, ServerStatus};
pub use external_user::{ExternalUserRecord, LDAP_AUTH_MODULE};
pub use mapping::{OrgRoleAssignment, RoleMappingRule, WILDCARD_GROUP};
pub use organization::{Organization, TeamMembership};
pub use role::OrgRole;
pub use sync::{DirectoryLookup, SyncDecision, SyncOutcome, SyncSettings};
pub use user::{UpsertExternalUser, User};
pub use view::{DirectoryUserView, MappedAttribute, ServerStatusView};
