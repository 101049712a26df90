//! LDAP directory client for Identity Sync.
//!
//! This crate contains:
//! - Directory configuration file loading and validation
//! - Mapping of LDAP search entries onto external user records
//! - The [`LdapDirectoryClient`] implementation of `domain`'s directory client trait

pub mod client;
pub mod config;
pub mod entry;

pub use client::LdapDirectoryClient;
pub use config::{DirectoryConfig, DirectoryConfigError};
