//! Domain layer for the Identity Sync backend.
//!
//! This crate contains:
//! - Domain models (external directory users, mapping rules, role assignments)
//! - Collaborator traits for the directory, organization, team and user stores
//! - The reconciliation logic deriving internal authorization from directory state
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::ReconcileError;
