//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Absent when the stores are not database backed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseHealth>,
    pub ldap: LdapHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Directory integration status. Server reachability is reported by the
/// admin status endpoint, not here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LdapHealth {
    pub enabled: bool,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let database = match &state.pool {
        Some(pool) => {
            let start = std::time::Instant::now();
            let connected = persistence::db::check_connection(pool).await.is_ok();
            let latency_ms = start.elapsed().as_millis() as u64;
            Some(DatabaseHealth {
                connected,
                latency_ms: connected.then_some(latency_ms),
            })
        }
        None => None,
    };

    let healthy = database.as_ref().map_or(true, |db| db.connected);

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        ldap: LdapHealth {
            enabled: state.ldap.is_some(),
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the service can accept traffic (database connected).
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    if let Some(pool) = &state.pool {
        persistence::metrics::record_pool_metrics(pool);
        if persistence::db::check_connection(pool).await.is_err() {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    Ok(Json(StatusResponse {
        status: "ready".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_without_database() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.3.0".to_string(),
            database: None,
            ldap: LdapHealth { enabled: true },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["ldap"]["enabled"], true);
        assert!(json.get("database").is_none());
    }

    #[test]
    fn test_health_response_unhealthy_database() {
        let response = HealthResponse {
            status: "unhealthy".to_string(),
            version: "0.3.0".to_string(),
            database: Some(DatabaseHealth {
                connected: false,
                latency_ms: None,
            }),
            ldap: LdapHealth { enabled: false },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["database"]["connected"], false);
        assert!(json["database"]["latency_ms"].is_null());
    }

    #[tokio::test]
    async fn test_live() {
        let Json(response) = live().await;
        assert_eq!(response.status, "alive");
    }
}
