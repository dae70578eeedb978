//! Input validation functions
//!
//! Length bounds live on the form types as `validator` derives; the checks
//! here cover what the derive attributes cannot express.

use validator::ValidationError;

/// bcrypt ignores input past this many bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validate a login identifier (matriculation number or staff ID)
pub fn validate_identifier(identifier: &str) -> Result<(), String> {
    if identifier.is_empty() {
        return Err("Identifier cannot be empty".to_string());
    }
    if identifier.len() > 64 {
        return Err("Identifier too long".to_string());
    }
    if identifier.chars().any(char::is_whitespace) {
        return Err("Identifier cannot contain whitespace".to_string());
    }
    Ok(())
}

/// Validate a password before hashing
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        ));
    }
    Ok(())
}

/// `validator` adapter for [`validate_password`], used on the form types
pub fn password_field(password: &str) -> Result<(), ValidationError> {
    validate_password(password).map_err(|message| {
        let mut error = ValidationError::new("password");
        error.message = Some(message.into());
        error
    })
}

/// Validate a hall name as it appears in paths and forms
pub fn validate_hall_name(hall: &str) -> Result<(), String> {
    let trimmed = hall.trim();
    if trimmed.is_empty() {
        return Err("Hall cannot be empty".to_string());
    }
    if trimmed.len() != hall.len() {
        return Err("Hall cannot start or end with whitespace".to_string());
    }
    if hall.contains('/') {
        return Err("Hall cannot contain '/'".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("U1001")]
    #[case("S1")]
    #[case("CSC/2019/001")]
    fn test_valid_identifiers(#[case] id: &str) {
        assert!(validate_identifier(id).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("U 1001")]
    #[case(" S1")]
    #[case("S1\t")]
    fn test_invalid_identifiers(#[case] id: &str) {
        assert!(validate_identifier(id).is_err());
    }

    #[test]
    fn test_identifier_too_long() {
        let id = "a".repeat(65);
        assert!(validate_identifier(&id).is_err());
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("").is_err());
        assert!(validate_password("p").is_ok());
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_BYTES)).is_ok());
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_BYTES + 1)).is_err());
    }

    #[rstest]
    #[case("Hall A", true)]
    #[case("Queen Amina", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case(" Hall A", false)]
    #[case("Hall/A", false)]
    fn test_hall_names(#[case] hall: &str, #[case] valid: bool) {
        assert_eq!(validate_hall_name(hall).is_ok(), valid);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_printable_passwords_within_limit_are_valid(password in "[ -~]{1,72}") {
            prop_assert!(validate_password(&password).is_ok());
        }

        #[test]
        fn prop_identifiers_without_whitespace_are_valid(id in "[A-Za-z0-9/_-]{1,64}") {
            prop_assert!(validate_identifier(&id).is_ok());
        }
    }
}
