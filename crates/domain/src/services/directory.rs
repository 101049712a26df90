//! Directory client abstraction.
//!
//! The reconciliation services only see the directory through [`DirectoryClient`];
//! the LDAP implementation lives in the `directory` crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use crate::models::{DirectoryServerConfig, ExternalUserRecord, ServerStatus};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The user has no entry on any configured server.
    #[error("Unable to find user in the directory: {0}")]
    UserNotFound(String),

    #[error("Directory configuration error: {0}")]
    Configuration(String),

    /// No server could be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// A server answered with an error or an unusable entry.
    #[error("Directory protocol error: {0}")]
    Protocol(String),
}

/// Client for the external directory across every configured server.
#[async_trait::async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Health of each configured server, in configuration order.
    async fn ping(&self) -> Result<Vec<ServerStatus>, DirectoryError>;

    /// Fetch one user by login, along with the configuration of the server that answered.
    async fn lookup_user(
        &self,
        login: &str,
    ) -> Result<(ExternalUserRecord, DirectoryServerConfig), DirectoryError>;

    /// Re-read the directory configuration.
    ///
    /// Fails with [`DirectoryError::Configuration`] when the client has no
    /// source to re-read or the new configuration is invalid. The previous
    /// configuration then stays in effect.
    async fn reload(&self) -> Result<(), DirectoryError>;
}

/// In-memory directory client for development and testing.
#[derive(Debug, Default)]
pub struct MockDirectoryClient {
    statuses: Vec<ServerStatus>,
    users: HashMap<String, (ExternalUserRecord, DirectoryServerConfig)>,
    failure: Option<DirectoryError>,
    lookups: AtomicUsize,
    reloads: AtomicUsize,
}

impl MockDirectoryClient {
    /// Create a new mock client with no servers and no users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client whose every call fails with `error`.
    pub fn failing(error: DirectoryError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ServerStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn with_user(mut self, user: ExternalUserRecord, server: DirectoryServerConfig) -> Self {
        self.users.insert(user.login.clone(), (user, server));
        self
    }

    /// Number of `lookup_user` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `reload` calls served so far.
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DirectoryClient for MockDirectoryClient {
    async fn ping(&self) -> Result<Vec<ServerStatus>, DirectoryError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.statuses.clone())
    }

    async fn lookup_user(
        &self,
        login: &str,
    ) -> Result<(ExternalUserRecord, DirectoryServerConfig), DirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.users
            .get(login)
            .cloned()
            .ok_or_else(|| DirectoryError::UserNotFound(login.to_string()))
    }

    async fn reload(&self) -> Result<(), DirectoryError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
