//! User sync decision.
//!
//! A known internal user is looked up in the directory by login:
//! 1. Present in the directory: upsert the fetched attributes
//! 2. Absent and the configured super admin: refuse, leave the account alone
//! 3. Absent otherwise: disable the account
//!
//! Any other directory failure is returned before a decision is made.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::error::ReconcileError;
use crate::models::{DirectoryLookup, SyncDecision, SyncOutcome, SyncSettings, UpsertExternalUser};
use crate::services::directory::{DirectoryClient, DirectoryError};
use crate::services::stores::UserStore;

/// Pure decision for one user given the directory lookup result.
pub fn decide_sync(login: &str, lookup: &DirectoryLookup, settings: &SyncSettings) -> SyncDecision {
    match lookup {
        DirectoryLookup::Found(_) => SyncDecision::Upsert,
        DirectoryLookup::Absent if login == settings.admin_login => SyncDecision::Refuse,
        DirectoryLookup::Absent => SyncDecision::Disable,
    }
}

/// Drives the sync decision against real collaborators.
#[derive(Clone)]
pub struct UserSyncService {
    directory: Arc<dyn DirectoryClient>,
    users: Arc<dyn UserStore>,
    settings: SyncSettings,
}

impl UserSyncService {
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        users: Arc<dyn UserStore>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            directory,
            users,
            settings,
        }
    }

    /// Sync one internal user with its current directory state.
    pub async fn sync_user(&self, user_id: Uuid) -> Result<SyncOutcome, ReconcileError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ReconcileError::UserNotFound(user_id.to_string()))?;

        let lookup = match self.directory.lookup_user(&user.login).await {
            Ok((record, _server)) => DirectoryLookup::Found(record),
            Err(DirectoryError::UserNotFound(_)) => DirectoryLookup::Absent,
            Err(err) => return Err(err.into()),
        };

        let decision = decide_sync(&user.login, &lookup, &self.settings);

        match (decision, lookup) {
            (SyncDecision::Refuse, _) => {
                let err = ReconcileError::RefusedSuperAdmin(user.login.clone());
                error!(user_id = %user.id, login = %user.login, "{}", err);
                return Err(err);
            }
            (SyncDecision::Disable, _) => {
                self.users.disable_external(&user.login).await?;
                info!(
                    user_id = %user.id,
                    login = %user.login,
                    "User absent from directory, disabled"
                );
            }
            (SyncDecision::Upsert, DirectoryLookup::Found(record)) => {
                self.users
                    .upsert(UpsertExternalUser {
                        external_user: record,
                        signup_allowed: self.settings.allow_signup,
                    })
                    .await?;
                info!(user_id = %user.id, login = %user.login, "User synced from directory");
            }
            (SyncDecision::Upsert, DirectoryLookup::Absent) => {
                return Err(ReconcileError::DirectoryUserNotFound(user.login));
            }
        }

        Ok(SyncOutcome {
            user_id: user.id,
            login: user.login,
            decision,
        })
    }
}
