//! Shared utilities and common types for the Identity Sync backend.
//!
//! This crate provides common functionality used across all other crates:
//! - API key hashing
//! - Whitespace token splitting for directory attribute values
//! - Login validation

pub mod crypto;
pub mod text;
pub mod validation;
