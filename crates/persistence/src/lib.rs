//! Persistence layer for Identity Sync.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the organization, team and user stores

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

pub use repositories::{OrganizationRepository, TeamRepository, UserRepository};
