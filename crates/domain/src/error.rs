//! Domain error types for reconciliation and sync.

use thiserror::Error;
use uuid::Uuid;

use crate::services::directory::DirectoryError;
use crate::services::stores::StoreError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Directory integration disabled or misconfigured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No user was found on the LDAP server(s): {0}")]
    DirectoryUserNotFound(String),

    /// A mapping rule references an organization that no longer exists.
    #[error("Unable to find organization with ID '{0}'")]
    OrganizationNotFound(Uuid),

    #[error("Refusing to sync super admin \"{0}\" - it would be disabled")]
    RefusedSuperAdmin(String),

    /// Directory unreachable or failing.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Store backend failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl From<DirectoryError> for ReconcileError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UserNotFound(login) => ReconcileError::DirectoryUserNotFound(login),
            DirectoryError::Configuration(msg) => ReconcileError::Configuration(msg),
            other => ReconcileError::Upstream(other.to_string()),
        }
    }
}

impl From<StoreError> for ReconcileError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ReconcileError::UserNotFound(what),
            StoreError::SignupNotAllowed(_) | StoreError::NotExternal(_) => {
                ReconcileError::Validation(err.to_string())
            }
            StoreError::Backend(msg) => ReconcileError::Store(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_not_found_maps_to_not_found() {
        let err: ReconcileError = DirectoryError::UserNotFound("ada".to_string()).into();
        assert!(matches!(err, ReconcileError::DirectoryUserNotFound(login) if login == "ada"));
    }

    #[test]
    fn test_directory_unavailable_maps_to_upstream() {
        let err: ReconcileError = DirectoryError::Unavailable("timeout".to_string()).into();
        match err {
            ReconcileError::Upstream(msg) => assert!(msg.contains("timeout")),
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_store_backend_maps_to_store() {
        let err: ReconcileError = StoreError::Backend("pool closed".to_string()).into();
        assert!(matches!(err, ReconcileError::Store(msg) if msg == "pool closed"));
    }

    #[test]
    fn test_signup_refusal_maps_to_validation() {
        let err: ReconcileError = StoreError::SignupNotAllowed("ada".to_string()).into();
        match err {
            ReconcileError::Validation(msg) => assert!(msg.contains("ada")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_local_account_maps_to_validation() {
        let err: ReconcileError = StoreError::NotExternal("hopper".to_string()).into();
        match err {
            ReconcileError::Validation(msg) => {
                assert_eq!(msg, "User 'hopper' is not managed by the directory")
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let id = Uuid::nil();
        assert_eq!(
            ReconcileError::OrganizationNotFound(id).to_string(),
            format!("Unable to find organization with ID '{}'", id)
        );
        assert_eq!(
            ReconcileError::RefusedSuperAdmin("admin".to_string()).to_string(),
            "Refusing to sync super admin \"admin\" - it would be disabled"
        );
    }
}
