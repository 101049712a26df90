//! Organization, team and user store abstractions.
//!
//! The PostgreSQL implementations live in the `persistence` crate. The
//! in-memory stores below back development setups and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Organization, OrgRole, TeamMembership, UpsertExternalUser, User, LDAP_AUTH_MODULE,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The user does not exist and the command did not allow creating it.
    #[error("Signup is not allowed for user '{0}'")]
    SignupNotAllowed(String),

    /// The account exists but was not created from the directory.
    #[error("User '{0}' is not managed by the directory")]
    NotExternal(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Batch lookup of organizations.
#[async_trait::async_trait]
pub trait OrgStore: Send + Sync {
    /// Organizations whose id is in `ids`. Unknown ids are simply absent from the result.
    async fn search_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Organization>, StoreError>;
}

/// Resolution of directory groups to internal teams.
#[async_trait::async_trait]
pub trait TeamStore: Send + Sync {
    async fn teams_for_directory_groups(
        &self,
        groups: &[String],
    ) -> Result<Vec<TeamMembership>, StoreError>;
}

/// Internal user accounts.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Merge directory attributes and org roles into the user matching the login.
    async fn upsert(&self, cmd: UpsertExternalUser) -> Result<User, StoreError>;

    /// Mark the directory-sourced account with this login disabled.
    ///
    /// Accounts with another auth module are left alone and reported as
    /// [`StoreError::NotExternal`].
    async fn disable_external(&self, login: &str) -> Result<(), StoreError>;
}

/// In-memory organization store.
#[derive(Debug, Default)]
pub struct InMemoryOrgStore {
    orgs: Vec<Organization>,
    searches: AtomicUsize,
}

impl InMemoryOrgStore {
    pub fn new(orgs: Vec<Organization>) -> Self {
        Self {
            orgs,
            searches: AtomicUsize::new(0),
        }
    }

    /// Number of `search_by_ids` round trips served so far.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl OrgStore for InMemoryOrgStore {
    async fn search_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Organization>, StoreError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .orgs
            .iter()
            .filter(|org| ids.contains(&org.id))
            .cloned()
            .collect())
    }
}

/// In-memory team store keyed by directory group DN.
#[derive(Debug, Default)]
pub struct InMemoryTeamStore {
    teams: Vec<TeamMembership>,
}

impl InMemoryTeamStore {
    pub fn new(teams: Vec<TeamMembership>) -> Self {
        Self { teams }
    }
}

#[async_trait::async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn teams_for_directory_groups(
        &self,
        groups: &[String],
    ) -> Result<Vec<TeamMembership>, StoreError> {
        Ok(self
            .teams
            .iter()
            .filter(|team| groups.iter().any(|g| g.eq_ignore_ascii_case(&team.group_dn)))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct UserState {
    users: HashMap<Uuid, User>,
    org_roles: HashMap<Uuid, HashMap<Uuid, OrgRole>>,
    upserts: Vec<UpsertExternalUser>,
    disabled: Vec<String>,
}

/// In-memory user store that records every mutation.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: Mutex<UserState>,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<User>) -> Self {
        let state = UserState {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            ..UserState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Upsert commands received so far.
    pub fn upserts(&self) -> Vec<UpsertExternalUser> {
        self.lock().upserts.clone()
    }

    /// Logins disabled through `disable_external` so far.
    pub fn disabled_logins(&self) -> Vec<String> {
        self.lock().disabled.clone()
    }

    pub fn org_roles_of(&self, user_id: Uuid) -> HashMap<Uuid, OrgRole> {
        self.lock()
            .org_roles
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, UserState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn upsert(&self, cmd: UpsertExternalUser) -> Result<User, StoreError> {
        let mut state = self.lock();
        state.upserts.push(cmd.clone());

        let ext = cmd.external_user;
        let now = Utc::now();
        let existing = state
            .users
            .values()
            .find(|u| u.login == ext.login)
            .map(|u| u.id);

        let user = match existing {
            Some(id) => {
                let user = state
                    .users
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::NotFound(ext.login.clone()))?;
                user.email = ext.email.clone();
                user.name = ext.name.clone();
                user.auth_module = Some(ext.auth_module.clone());
                user.is_disabled = ext.is_disabled;
                if let Some(is_admin) = ext.is_admin {
                    user.is_admin = is_admin;
                }
                user.updated_at = now;
                user.clone()
            }
            None if cmd.signup_allowed => {
                let user = User {
                    id: Uuid::new_v4(),
                    login: ext.login.clone(),
                    email: ext.email.clone(),
                    name: ext.name.clone(),
                    auth_module: Some(ext.auth_module.clone()),
                    is_admin: ext.is_admin.unwrap_or(false),
                    is_disabled: ext.is_disabled,
                    created_at: now,
                    updated_at: now,
                };
                state.users.insert(user.id, user.clone());
                user
            }
            None => return Err(StoreError::SignupNotAllowed(ext.login)),
        };

        state.org_roles.insert(user.id, ext.org_roles);
        Ok(user)
    }

    async fn disable_external(&self, login: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        let user = state
            .users
            .values_mut()
            .find(|u| u.login == login)
            .ok_or_else(|| StoreError::NotFound(login.to_string()))?;
        if user.auth_module.as_deref() != Some(LDAP_AUTH_MODULE) {
            return Err(StoreError::NotExternal(login.to_string()));
        }
        user.is_disabled = true;
        user.updated_at = Utc::now();
        state.disabled.push(login.to_string());
        Ok(())
    }
}
