use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use directory::LdapDirectoryClient;
use domain::models::SyncSettings;
use domain::services::{
    DirectoryClient, DirectoryDebugService, OrgStore, TeamStore, UserStore, UserSyncService,
};
use persistence::{OrganizationRepository, TeamRepository, UserRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, trace_id};
use crate::routes::{health, ldap};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when the stores are not database backed.
    pub pool: Option<PgPool>,
    /// `None` when the directory integration is disabled.
    pub ldap: Option<LdapServices>,
}

impl AppState {
    /// Directory services, or the "not enabled" error every LDAP endpoint returns.
    pub fn ldap(&self) -> Result<&LdapServices, ApiError> {
        self.ldap.as_ref().ok_or_else(ApiError::ldap_disabled)
    }
}

/// Directory collaborators shared by the LDAP handlers.
#[derive(Clone)]
pub struct LdapServices {
    pub directory: Arc<dyn DirectoryClient>,
    pub debug: Arc<DirectoryDebugService>,
    pub sync: Arc<UserSyncService>,
}

impl LdapServices {
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        orgs: Arc<dyn OrgStore>,
        teams: Option<Arc<dyn TeamStore>>,
        users: Arc<dyn UserStore>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            debug: Arc::new(DirectoryDebugService::new(directory.clone(), orgs, teams)),
            sync: Arc::new(UserSyncService::new(directory.clone(), users, settings)),
            directory,
        }
    }
}

/// Sync settings taken from the `admin` and `ldap` config sections.
pub fn sync_settings(config: &Config) -> SyncSettings {
    SyncSettings {
        admin_login: config.admin.login.clone(),
        allow_signup: config.ldap.allow_signup,
    }
}

/// Build the application against PostgreSQL and, when enabled, the LDAP servers
/// listed in `ldap.config_file`.
pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let ldap = if config.ldap.enabled {
        let directory = LdapDirectoryClient::from_file(&config.ldap.config_file)
            .with_context(|| format!("loading {}", config.ldap.config_file))?;

        let teams: Arc<dyn TeamStore> = Arc::new(TeamRepository::new(pool.clone()));

        Some(LdapServices::new(
            Arc::new(directory),
            Arc::new(OrganizationRepository::new(pool.clone())),
            Some(teams),
            Arc::new(UserRepository::new(pool.clone())),
            sync_settings(&config),
        ))
    } else {
        info!("LDAP integration disabled");
        None
    };

    Ok(create_app_with_state(AppState {
        config: Arc::new(config),
        pool: Some(pool),
        ldap,
    }))
}

pub fn create_app_with_state(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route("/api/admin/v1/ldap/status", get(ldap::get_server_status))
        .route("/api/admin/v1/ldap/reload", post(ldap::reload_config))
        .route("/api/admin/v1/ldap/sync/:user_id", post(ldap::sync_user))
        .route("/api/admin/v1/ldap/", get(ldap::get_user_without_login))
        .route("/api/admin/v1/ldap/:username", get(ldap::get_user_by_login))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
