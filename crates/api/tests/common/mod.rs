//! Common test utilities for integration tests.
//!
//! The router runs against the in-memory directory client and stores from
//! `domain`, so no LDAP server or database is needed.

// Not every integration test uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use domain::models::{
    DirectoryServerConfig, ExternalUserRecord, OrgRole, Organization, RoleMappingRule,
    ServerStatus, TeamMembership, User, LDAP_AUTH_MODULE,
};
use domain::services::{
    InMemoryOrgStore, InMemoryTeamStore, InMemoryUserStore, MockDirectoryClient, TeamStore,
};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use identity_sync_api::{
    app::{create_app_with_state, sync_settings, AppState, LdapServices},
    config::{
        AdminConfig, Config, DatabaseConfig, LdapConfig, LoggingConfig, SecurityConfig,
        ServerConfig,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Raw admin key accepted by [`test_config`].
pub const ADMIN_KEY: &str = "ids_integration_admin_key";

pub const ADMINS_GROUP: &str = "cn=admins,ou=groups,dc=example,dc=org";
pub const EDITORS_GROUP: &str = "cn=editors,ou=groups,dc=example,dc=org";

pub fn test_config(ldap_enabled: bool) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            admin_api_keys: vec![shared::crypto::sha256_hex(ADMIN_KEY)],
        },
        ldap: LdapConfig {
            enabled: ldap_enabled,
            config_file: "config/ldap.toml".to_string(),
            allow_signup: true,
        },
        admin: AdminConfig {
            login: "admin".to_string(),
        },
    }
}

/// Directory and store contents shared by the LDAP tests.
pub struct Fixture {
    pub main_org: Organization,
    pub second_org: Organization,
    pub server: DirectoryServerConfig,
    /// Directory entry for `ada`, an admin of the main organization.
    pub directory_user: ExternalUserRecord,
    /// Internal account of `ada`.
    pub ada: User,
    /// Internal account of `grace`, who has left the directory.
    pub grace: User,
    /// Internal super admin account, absent from the directory.
    pub super_admin: User,
    /// Local account of `hopper`, never created from the directory.
    pub local_user: User,
    pub team: TeamMembership,
}

pub fn internal_user(login: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        login: login.to_string(),
        email: SafeEmail().fake(),
        name: String::new(),
        auth_module: Some(LDAP_AUTH_MODULE.to_string()),
        is_admin: false,
        is_disabled: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn fixture() -> Fixture {
    let main_org = Organization {
        id: Uuid::new_v4(),
        name: "Main Org.".to_string(),
    };
    let second_org = Organization {
        id: Uuid::new_v4(),
        name: "Research".to_string(),
    };

    let mut server = DirectoryServerConfig::new(
        "ldap.example.org",
        vec!["ou=users,dc=example,dc=org".to_string()],
    );
    server.attributes.username = "uid".to_string();
    server.attributes.email = "mail".to_string();
    server.group_mappings = vec![
        RoleMappingRule::new(ADMINS_GROUP, main_org.id, OrgRole::Admin),
        RoleMappingRule::new(EDITORS_GROUP, second_org.id, OrgRole::Editor),
    ];

    let directory_user = ExternalUserRecord {
        auth_module: LDAP_AUTH_MODULE.to_string(),
        auth_id: "uid=ada,ou=users,dc=example,dc=org".to_string(),
        login: "ada".to_string(),
        email: "ada@example.org".to_string(),
        name: "Ada Lovelace".to_string(),
        is_admin: None,
        is_disabled: false,
        org_roles: HashMap::from([(main_org.id, OrgRole::Admin)]),
        groups: vec![ADMINS_GROUP.to_string()],
    };

    let team = TeamMembership {
        team_id: Uuid::new_v4(),
        team_name: "Platform".to_string(),
        org_id: main_org.id,
        org_name: main_org.name.clone(),
        group_dn: ADMINS_GROUP.to_string(),
    };

    Fixture {
        main_org,
        second_org,
        server,
        directory_user,
        ada: internal_user("ada"),
        grace: internal_user("grace"),
        super_admin: internal_user("admin"),
        local_user: User {
            auth_module: None,
            ..internal_user("hopper")
        },
        team,
    }
}

/// Collaborators behind a test router, kept for assertions.
pub struct TestApp {
    pub router: Router,
    pub directory: Arc<MockDirectoryClient>,
    pub orgs: Arc<InMemoryOrgStore>,
    pub users: Arc<InMemoryUserStore>,
}

/// Router with the directory integration enabled.
pub fn ldap_app(fixture: &Fixture) -> TestApp {
    let directory = MockDirectoryClient::new()
        .with_status(ServerStatus {
            host: "ldap.example.org".to_string(),
            port: 389,
            available: true,
            error: None,
        })
        .with_status(ServerStatus {
            host: "ldap-backup.example.org".to_string(),
            port: 636,
            available: false,
            error: Some("connection refused".to_string()),
        })
        .with_user(fixture.directory_user.clone(), fixture.server.clone());

    let orgs = InMemoryOrgStore::new(vec![fixture.main_org.clone(), fixture.second_org.clone()]);
    ldap_app_with(fixture, directory, orgs)
}

/// Router with the given directory client and organization store.
pub fn ldap_app_with(
    fixture: &Fixture,
    directory: MockDirectoryClient,
    orgs: InMemoryOrgStore,
) -> TestApp {
    let config = test_config(true);
    let directory = Arc::new(directory);
    let orgs = Arc::new(orgs);
    let users = Arc::new(InMemoryUserStore::new(vec![
        fixture.ada.clone(),
        fixture.grace.clone(),
        fixture.super_admin.clone(),
        fixture.local_user.clone(),
    ]));
    let teams: Arc<dyn TeamStore> = Arc::new(InMemoryTeamStore::new(vec![fixture.team.clone()]));

    let ldap = LdapServices::new(
        directory.clone(),
        orgs.clone(),
        Some(teams),
        users.clone(),
        sync_settings(&config),
    );

    let router = create_app_with_state(AppState {
        config: Arc::new(config),
        pool: None,
        ldap: Some(ldap),
    });

    TestApp {
        router,
        directory,
        orgs,
        users,
    }
}

/// Router with the directory integration switched off.
pub fn disabled_app() -> Router {
    create_app_with_state(AppState {
        config: Arc::new(test_config(false)),
        pool: None,
        ldap: None,
    })
}

/// Admin request carrying a valid API key.
pub fn admin_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", ADMIN_KEY)
        .body(Body::empty())
        .unwrap()
}

pub fn anonymous_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
