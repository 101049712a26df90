//! Display name splitting.

use shared::text::split_tokens;

/// Split a full display name into a first name and a surname.
///
/// Only the first two whitespace-delimited tokens are kept; this is not a
/// name parser.
pub fn split_display_name(full: &str) -> (String, String) {
    match split_tokens(full).as_slice() {
        [] => (String::new(), String::new()),
        [first] => (first.to_string(), String::new()),
        [first, last, ..] => (first.to_string(), last.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    #[test]
    fn test_split_empty() {
        assert_eq!(split_display_name(""), (String::new(), String::new()));
        assert_eq!(split_display_name("  "), (String::new(), String::new()));
    }

    #[test]
    fn test_split_single_token() {
        assert_eq!(split_display_name("Ada"), ("Ada".to_string(), String::new()));
    }

    #[test]
    fn test_split_discards_extra_tokens() {
        assert_eq!(
            split_display_name("Ada Lovelace Extra"),
            ("Ada".to_string(), "Lovelace".to_string())
        );
    }

    #[test]
    fn test_split_generated_names() {
        for _ in 0..20 {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let first = first.replace(' ', "-");
            let last = last.replace(' ', "-");
            let full = format!("  {}\t{}  ", first, last);
            assert_eq!(split_display_name(&full), (first, last));
        }
    }
}
