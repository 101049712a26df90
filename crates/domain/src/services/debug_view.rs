//! Directory debug view assembly.
//!
//! Shows how a directory user would be mapped when synced, without touching
//! the user store.

use std::sync::Arc;

use tracing::debug;

use crate::error::ReconcileError;
use crate::models::{DirectoryUserView, MappedAttribute, ServerStatusView};
use crate::services::directory::{DirectoryClient, DirectoryError};
use crate::services::display_name::split_display_name;
use crate::services::reconciliation::{compute_org_roles, resolve_org_names};
use crate::services::stores::{OrgStore, TeamStore};

#[derive(Clone)]
pub struct DirectoryDebugService {
    directory: Arc<dyn DirectoryClient>,
    orgs: Arc<dyn OrgStore>,
    /// `None` when no team service is configured; teams are then reported empty.
    teams: Option<Arc<dyn TeamStore>>,
}

impl DirectoryDebugService {
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        orgs: Arc<dyn OrgStore>,
        teams: Option<Arc<dyn TeamStore>>,
    ) -> Self {
        Self {
            directory,
            orgs,
            teams,
        }
    }

    /// Health of every configured directory server.
    pub async fn server_statuses(&self) -> Result<Vec<ServerStatusView>, ReconcileError> {
        let statuses = self.directory.ping().await?;
        Ok(statuses.into_iter().map(ServerStatusView::from).collect())
    }

    /// Look a login up in the directory and show how it maps onto organizations and teams.
    pub async fn inspect_user(&self, login: &str) -> Result<DirectoryUserView, ReconcileError> {
        shared::validation::validate_login(login).map_err(|e| {
            ReconcileError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            )
        })?;

        let (user, server) = match self.directory.lookup_user(login).await {
            Ok(found) => found,
            Err(DirectoryError::UserNotFound(_)) => {
                return Err(ReconcileError::DirectoryUserNotFound(login.to_string()))
            }
            Err(err) => return Err(err.into()),
        };

        debug!(login = %user.login, auth_id = %user.auth_id, "Directory user found");

        let (name, surname) = split_display_name(&user.name);
        let attrs = &server.attributes;

        let mut roles = compute_org_roles(&user, &server.group_mappings);
        debug!(
            login = %user.login,
            rules = roles.len(),
            matched = roles.iter().filter(|r| r.is_matched()).count(),
            "Mapped organization roles"
        );
        resolve_org_names(&mut roles, self.orgs.as_ref()).await?;

        let teams = match &self.teams {
            Some(teams) => teams.teams_for_directory_groups(&user.groups).await?,
            None => Vec::new(),
        };

        Ok(DirectoryUserView {
            name: MappedAttribute::new(&attrs.name, name),
            surname: MappedAttribute::new(&attrs.surname, surname),
            email: MappedAttribute::new(&attrs.email, &user.email),
            login: MappedAttribute::new(&attrs.username, &user.login),
            is_admin: user.is_admin,
            is_disabled: user.is_disabled,
            roles,
            teams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DirectoryServerConfig, ExternalUserRecord, OrgRole, Organization, RoleMappingRule,
        ServerStatus, TeamMembership, LDAP_AUTH_MODULE,
    };
    use crate::services::directory::MockDirectoryClient;
    use crate::services::stores::{InMemoryOrgStore, InMemoryTeamStore};
    use uuid::Uuid;

    struct Fixture {
        org_a: Uuid,
        org_b: Uuid,
        server: DirectoryServerConfig,
        user: ExternalUserRecord,
    }

    fn fixture() -> Fixture {
        let (org_a, org_b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut server = DirectoryServerConfig::new("ldap.example.org", vec!["dc=example,dc=org".to_string()]);
        server.group_mappings = vec![
            RoleMappingRule::new("cn=admins,dc=example,dc=org", org_a, OrgRole::Admin),
            RoleMappingRule::new("cn=editors,dc=example,dc=org", org_b, OrgRole::Editor),
        ];
        let user = ExternalUserRecord {
            auth_module: LDAP_AUTH_MODULE.to_string(),
            auth_id: "cn=ada,ou=users,dc=example,dc=org".to_string(),
            login: "ada".to_string(),
            email: "ada@example.org".to_string(),
            name: "Ada Lovelace Byron".to_string(),
            is_admin: Some(true),
            is_disabled: false,
            org_roles: [(org_a, OrgRole::Admin)].into_iter().collect(),
            groups: vec!["cn=admins,dc=example,dc=org".to_string()],
        };
        Fixture {
            org_a,
            org_b,
            server,
            user,
        }
    }

    fn orgs(f: &Fixture) -> Arc<InMemoryOrgStore> {
        Arc::new(InMemoryOrgStore::new(vec![
            Organization {
                id: f.org_a,
                name: "Org A".to_string(),
            },
            Organization {
                id: f.org_b,
                name: "Org B".to_string(),
            },
        ]))
    }

    #[tokio::test]
    async fn test_inspect_user_assembles_view() {
        let f = fixture();
        let team = TeamMembership {
            team_id: Uuid::new_v4(),
            team_name: "Platform".to_string(),
            org_id: f.org_a,
            org_name: "Org A".to_string(),
            group_dn: "cn=admins,dc=example,dc=org".to_string(),
        };
        let directory = MockDirectoryClient::new().with_user(f.user.clone(), f.server.clone());
        let service = DirectoryDebugService::new(
            Arc::new(directory),
            orgs(&f),
            Some(Arc::new(InMemoryTeamStore::new(vec![team.clone()]))),
        );

        let view = service.inspect_user("ada").await.unwrap();

        assert_eq!(view.name, MappedAttribute::new("givenName", "Ada"));
        assert_eq!(view.surname, MappedAttribute::new("sn", "Lovelace"));
        assert_eq!(view.email.directory_value, "ada@example.org");
        assert_eq!(view.login, MappedAttribute::new("cn", "ada"));
        assert_eq!(view.is_admin, Some(true));
        assert_eq!(view.roles.len(), 2);
        assert_eq!(view.roles[0].org_role, Some(OrgRole::Admin));
        assert_eq!(view.roles[0].org_name, "Org A");
        assert_eq!(view.roles[1].org_role, None);
        assert_eq!(view.roles[1].org_name, "Org B");
        assert_eq!(view.teams, vec![team]);
    }

    #[tokio::test]
    async fn test_inspect_user_without_team_service() {
        let f = fixture();
        let directory = MockDirectoryClient::new().with_user(f.user.clone(), f.server.clone());
        let service = DirectoryDebugService::new(Arc::new(directory), orgs(&f), None);

        let view = service.inspect_user("ada").await.unwrap();
        assert!(view.teams.is_empty());
    }

    #[tokio::test]
    async fn test_inspect_user_dangling_org_fails() {
        let f = fixture();
        let directory = MockDirectoryClient::new().with_user(f.user.clone(), f.server.clone());
        let only_a = Arc::new(InMemoryOrgStore::new(vec![Organization {
            id: f.org_a,
            name: "Org A".to_string(),
        }]));
        let service = DirectoryDebugService::new(Arc::new(directory), only_a, None);

        let err = service.inspect_user("ada").await.unwrap_err();
        assert!(matches!(err, ReconcileError::OrganizationNotFound(id) if id == f.org_b));
    }

    #[tokio::test]
    async fn test_inspect_user_empty_login() {
        let service = DirectoryDebugService::new(
            Arc::new(MockDirectoryClient::new()),
            Arc::new(InMemoryOrgStore::default()),
            None,
        );
        let err = service.inspect_user("").await.unwrap_err();
        assert!(matches!(err, ReconcileError::Validation(_)));
    }

    #[tokio::test]
    async fn test_inspect_unknown_user() {
        let service = DirectoryDebugService::new(
            Arc::new(MockDirectoryClient::new()),
            Arc::new(InMemoryOrgStore::default()),
            None,
        );
        let err = service.inspect_user("ghost").await.unwrap_err();
        assert!(matches!(err, ReconcileError::DirectoryUserNotFound(login) if login == "ghost"));
    }

    #[tokio::test]
    async fn test_server_statuses() {
        let directory = MockDirectoryClient::new()
            .with_status(ServerStatus {
                host: "a.example.org".to_string(),
                port: 389,
                available: true,
                error: None,
            })
            .with_status(ServerStatus {
                host: "b.example.org".to_string(),
                port: 636,
                available: false,
                error: Some("connection refused".to_string()),
            });
        let service = DirectoryDebugService::new(
            Arc::new(directory),
            Arc::new(InMemoryOrgStore::default()),
            None,
        );

        let statuses = service.server_statuses().await.unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].error, "");
        assert_eq!(statuses[1].error, "connection refused");
    }
}
