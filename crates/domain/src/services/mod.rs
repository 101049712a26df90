//! Domain services for Identity Sync.
//!
//! Services contain the reconciliation logic and the collaborator traits it runs against.

pub mod debug_view;
pub mod directory;
pub mod display_name;
pub mod group_mapping;
pub mod reconciliation;
pub mod stores;
pub mod user_sync;

pub use debug_view::DirectoryDebugService;
pub use directory::{DirectoryClient, DirectoryError, MockDirectoryClient};
pub use display_name::split_display_name;
pub use group_mapping::{derive_org_roles, DerivedRoles};
pub use reconciliation::{compute_org_roles, is_match, resolve_org_names};
pub use stores::{
    InMemoryOrgStore, InMemoryTeamStore, InMemoryUserStore, OrgStore, StoreError, TeamStore,
    UserStore,
};
pub use user_sync::{decide_sync, UserSyncService};
