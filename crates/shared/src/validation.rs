//! Common validation utilities.

use validator::ValidationError;

/// Maximum accepted length of a directory login.
pub const MAX_LOGIN_LENGTH: usize = 256;

/// Validates a login name supplied by an operator for a directory lookup.
///
/// - Must not be empty or whitespace only
/// - Must not exceed [`MAX_LOGIN_LENGTH`] characters
/// - Must not contain control characters
pub fn validate_login(login: &str) -> Result<(), ValidationError> {
    if login.trim().is_empty() {
        let mut err = ValidationError::new("login_required");
        err.message = Some("You must specify an username".into());
        return Err(err);
    }

    if login.chars().count() > MAX_LOGIN_LENGTH {
        let mut err = ValidationError::new("login_length");
        err.message = Some(format!("Username cannot exceed {} characters", MAX_LOGIN_LENGTH).into());
        return Err(err);
    }

    if login.chars().any(char::is_control) {
        let mut err = ValidationError::new("login_characters");
        err.message = Some("Username cannot contain control characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login_accepts_common_logins() {
        assert!(validate_login("ada").is_ok());
        assert!(validate_login("ada.lovelace@example.com").is_ok());
        assert!(validate_login("DOMAIN\\ada").is_ok());
    }

    #[test]
    fn test_validate_login_empty() {
        let err = validate_login("").unwrap_err();
        assert_eq!(err.code, "login_required");
        assert!(validate_login("   ").is_err());
    }

    #[test]
    fn test_validate_login_too_long() {
        let long = "a".repeat(MAX_LOGIN_LENGTH + 1);
        let err = validate_login(&long).unwrap_err();
        assert_eq!(err.code, "login_length");
        assert!(validate_login(&"a".repeat(MAX_LOGIN_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_login_control_characters() {
        let err = validate_login("ada\u{0}").unwrap_err();
        assert_eq!(err.code, "login_characters");
    }
}
