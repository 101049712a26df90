//! Text helpers for directory attribute values.

/// Splits a string into whitespace-delimited tokens.
///
/// Runs of whitespace collapse, leading and trailing whitespace is ignored.
pub fn split_tokens(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}
