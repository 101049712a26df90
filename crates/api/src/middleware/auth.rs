//! Admin API key authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::crypto::{key_matches_any, ADMIN_KEY_PREFIX};
use tracing::warn;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the admin API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware for admin-only routes.
///
/// The `X-API-Key` header must hash to one of the configured admin key digests.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let Some(api_key) = api_key else {
        return unauthorized_response("Invalid or missing API key");
    };

    if !is_admin_key(api_key, &state.config.security.admin_api_keys) {
        warn!(path = %req.uri().path(), "Rejected admin request with unknown API key");
        return unauthorized_response("Invalid or missing API key");
    }

    next.run(req).await
}

fn is_admin_key(presented: &str, digests: &[String]) -> bool {
    presented.starts_with(ADMIN_KEY_PREFIX) && key_matches_any(presented, digests)
}

fn unauthorized_response(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shared::crypto::sha256_hex;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Invalid or missing API key");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_is_admin_key() {
        let digests = vec![sha256_hex("ids_secret")];
        assert!(is_admin_key("ids_secret", &digests));
        assert!(!is_admin_key("ids_other", &digests));
        assert!(!is_admin_key("ids_secret", &[]));
    }

    #[test]
    fn test_is_admin_key_requires_prefix() {
        let digests = vec![sha256_hex("secret")];
        assert!(!is_admin_key("secret", &digests));
    }
}
