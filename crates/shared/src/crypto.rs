//! Cryptographic utilities for admin API key hashing.

use sha2::{Digest, Sha256};

/// Prefix carried by every admin API key issued for this service.
pub const ADMIN_KEY_PREFIX: &str = "ids_";

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a presented key against a list of stored SHA-256 hex digests.
///
/// The comparison walks every byte of every digest so timing does not reveal
/// how much of a digest matched.
pub fn key_matches_any(presented: &str, stored_hashes: &[String]) -> bool {
    let candidate = sha256_hex(presented);
    stored_hashes
        .iter()
        .fold(false, |found, stored| found | constant_time_eq(&candidate, stored))
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
