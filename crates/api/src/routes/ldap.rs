//! Directory debug endpoint handlers.
//!
//! Every handler answers 400 "LDAP is not enabled" while the integration is off.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use domain::models::{DirectoryUserView, ServerStatusView, SyncDecision};
use domain::ReconcileError;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::record_sync_decision;

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Health of every configured directory server.
///
/// GET /api/admin/v1/ldap/status
pub async fn get_server_status(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServerStatusView>>, ApiError> {
    let ldap = state.ldap()?;
    let statuses = ldap.debug.server_statuses().await?;
    Ok(Json(statuses))
}

/// Re-read the directory configuration file.
///
/// POST /api/admin/v1/ldap/reload
pub async fn reload_config(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let ldap = state.ldap()?;
    ldap.directory
        .reload()
        .await
        .map_err(ReconcileError::from)?;

    info!("LDAP config reloaded");
    Ok(MessageResponse::new("LDAP config reloaded"))
}

/// Sync one internal user with its directory entry.
///
/// POST /api/admin/v1/ldap/sync/:user_id
pub async fn sync_user(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let ldap = state.ldap()?;
    let Path(user_id) = user_id.map_err(|_| ApiError::Validation("user ID is invalid".into()))?;

    match ldap.sync.sync_user(user_id).await {
        Ok(outcome) => {
            record_sync_decision(outcome.decision);
            Ok(MessageResponse::new(outcome.message()))
        }
        Err(err @ ReconcileError::RefusedSuperAdmin(_)) => {
            record_sync_decision(SyncDecision::Refuse);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// How a directory user would be mapped onto organizations and teams.
///
/// GET /api/admin/v1/ldap/:username
pub async fn get_user_by_login(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<DirectoryUserView>, ApiError> {
    inspect(&state, &username).await
}

/// GET /api/admin/v1/ldap/ with no username
pub async fn get_user_without_login(
    State(state): State<AppState>,
) -> Result<Json<DirectoryUserView>, ApiError> {
    inspect(&state, "").await
}

async fn inspect(state: &AppState, username: &str) -> Result<Json<DirectoryUserView>, ApiError> {
    let ldap = state.ldap()?;
    let view = ldap.debug.inspect_user(username).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_serialization() {
        let Json(body) = MessageResponse::new("LDAP config reloaded");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "LDAP config reloaded"}));
    }
}
