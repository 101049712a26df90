//! Repository implementations for database operations.

pub mod organization;
pub mod team;
pub mod user;

pub use organization::OrganizationRepository;
pub use team::TeamRepository;
pub use user::UserRepository;

use domain::services::StoreError;

/// Wrap a driver error for the store seam.
pub(crate) fn backend_error(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}
