//! LDAP implementation of the directory client.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::models::{DirectoryServerConfig, ExternalUserRecord, ServerStatus};
use domain::services::{DirectoryClient, DirectoryError};
use futures::future::join_all;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{DirectoryConfig, DirectoryConfigError};
use crate::entry::{all_attr, first_attr, render_filter, requested_attributes, to_external_user};

/// LDAP result code returned when a search base does not exist.
const RC_NO_SUCH_OBJECT: u32 = 32;

/// Requests no attributes; only entry DNs come back.
const NO_ATTRIBUTES: &str = "1.1";

/// Directory client over one or more LDAP servers.
///
/// The configuration is swapped as a whole on [`DirectoryClient::reload`];
/// calls already in flight keep the snapshot they started with.
pub struct LdapDirectoryClient {
    config: RwLock<Arc<DirectoryConfig>>,
    source: Option<PathBuf>,
}

impl LdapDirectoryClient {
    /// Create a client from an already loaded configuration. Reloading is not possible.
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            source: None,
        }
    }

    /// Load the configuration from `path` and keep the path for reloads.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, DirectoryConfigError> {
        let path = path.into();
        let config = DirectoryConfig::load(&path)?;
        info!(path = %path.display(), servers = config.servers.len(), "Directory configuration loaded");
        Ok(Self {
            config: RwLock::new(Arc::new(config)),
            source: Some(path),
        })
    }

    /// Current configuration.
    pub async fn snapshot(&self) -> Arc<DirectoryConfig> {
        self.config.read().await.clone()
    }
}

#[async_trait]
impl DirectoryClient for LdapDirectoryClient {
    async fn ping(&self) -> Result<Vec<ServerStatus>, DirectoryError> {
        let config = self.snapshot().await;
        Ok(join_all(config.servers.iter().map(ping_server)).await)
    }

    async fn lookup_user(
        &self,
        login: &str,
    ) -> Result<(ExternalUserRecord, DirectoryServerConfig), DirectoryError> {
        let config = self.snapshot().await;
        if config.servers.is_empty() {
            return Err(DirectoryError::Configuration(
                "no directory servers configured".to_string(),
            ));
        }

        let mut reached_any = false;
        let mut last_dial_error = String::new();

        for server in &config.servers {
            let mut ldap = match connect(server).await {
                Ok(ldap) => ldap,
                Err(e) => {
                    warn!(host = %server.host, port = server.port, error = %e, "Directory server unreachable");
                    last_dial_error = e.to_string();
                    continue;
                }
            };
            reached_any = true;

            let found = lookup_on(&mut ldap, server, login).await;
            let _ = ldap.unbind().await;

            if let Some(user) = found? {
                debug!(login = %login, host = %server.host, dn = %user.auth_id, "Directory user found");
                return Ok((user, server.clone()));
            }
        }

        if reached_any {
            Err(DirectoryError::UserNotFound(login.to_string()))
        } else {
            Err(DirectoryError::Unavailable(last_dial_error))
        }
    }

    async fn reload(&self) -> Result<(), DirectoryError> {
        let path = self.source.as_ref().ok_or_else(|| {
            DirectoryError::Configuration("no configuration file to reload from".to_string())
        })?;

        let fresh = DirectoryConfig::load(path)
            .map_err(|e| DirectoryError::Configuration(e.to_string()))?;
        let servers = fresh.servers.len();

        *self.config.write().await = Arc::new(fresh);
        info!(path = %path.display(), servers, "Directory configuration reloaded");
        Ok(())
    }
}

async fn connect(server: &DirectoryServerConfig) -> Result<Ldap, LdapError> {
    let settings = LdapConnSettings::new()
        .set_conn_timeout(Duration::from_secs(server.timeout_secs))
        .set_starttls(server.start_tls)
        .set_no_tls_verify(server.skip_verify);
    let (conn, ldap) = LdapConnAsync::with_settings(settings, &server.url()).await?;

    ldap3::drive!(conn);
    Ok(ldap)
}

async fn ping_server(server: &DirectoryServerConfig) -> ServerStatus {
    let outcome = match connect(server).await {
        Ok(mut ldap) => {
            let _ = ldap.unbind().await;
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    };

    if let Err(error) = &outcome {
        warn!(host = %server.host, port = server.port, error = %error, "Directory server ping failed");
    }

    ServerStatus {
        host: server.host.clone(),
        port: server.port,
        available: outcome.is_ok(),
        error: outcome.err(),
    }
}

/// Bind, search every base DN and resolve groups on an open connection.
async fn lookup_on(
    ldap: &mut Ldap,
    server: &DirectoryServerConfig,
    login: &str,
) -> Result<Option<ExternalUserRecord>, DirectoryError> {
    let timeout = Duration::from_secs(server.timeout_secs);

    if !server.bind_dn.is_empty() {
        let bind_dn = server.bind_dn.replace("%s", login);
        ldap.with_timeout(timeout)
            .simple_bind(&bind_dn, &server.bind_password)
            .await
            .and_then(|r| r.success())
            .map_err(|e| DirectoryError::Protocol(format!("bind failed: {}", e)))?;
    }

    let filter = render_filter(&server.search_filter, login);
    let attrs = requested_attributes(server);

    let mut entry = None;
    for base in &server.search_base_dns {
        let mut found = search(ldap, timeout, base, &filter, attrs.clone()).await?;
        if !found.is_empty() {
            if found.len() > 1 {
                debug!(login = %login, base = %base, matches = found.len(), "Several entries matched, using the first");
            }
            entry = Some(found.swap_remove(0));
            break;
        }
    }

    let Some(entry) = entry else {
        return Ok(None);
    };

    let groups = if server.group_search_filter.is_empty() {
        all_attr(&entry, &server.attributes.member_of)
    } else {
        search_groups(ldap, server, &entry, login).await?
    };

    Ok(Some(to_external_user(&entry, groups, server)))
}

/// Group DNs returned by the configured group search.
async fn search_groups(
    ldap: &mut Ldap,
    server: &DirectoryServerConfig,
    entry: &SearchEntry,
    login: &str,
) -> Result<Vec<String>, DirectoryError> {
    let timeout = Duration::from_secs(server.timeout_secs);
    let value = if server.group_search_filter_user_attribute.is_empty() {
        login.to_string()
    } else {
        first_attr(entry, &server.group_search_filter_user_attribute)
    };
    let filter = render_filter(&server.group_search_filter, &value);

    let mut groups = Vec::new();
    for base in &server.group_search_base_dns {
        let found = search(ldap, timeout, base, &filter, vec![NO_ATTRIBUTES.to_string()]).await?;
        groups.extend(found.into_iter().map(|group| group.dn));
    }
    Ok(groups)
}

/// Subtree search. A missing base DN yields no entries.
async fn search(
    ldap: &mut Ldap,
    timeout: Duration,
    base: &str,
    filter: &str,
    attrs: Vec<String>,
) -> Result<Vec<SearchEntry>, DirectoryError> {
    let result = ldap
        .with_timeout(timeout)
        .search(base, Scope::Subtree, filter, attrs)
        .await
        .and_then(|r| r.success());

    match result {
        Ok((entries, _)) => Ok(entries.into_iter().map(SearchEntry::construct).collect()),
        Err(LdapError::LdapResult { result }) if result.rc == RC_NO_SUCH_OBJECT => {
            debug!(base = %base, "Search base does not exist");
            Ok(Vec::new())
        }
        Err(e) => Err(DirectoryError::Protocol(format!("search failed: {}", e))),
    }
}
