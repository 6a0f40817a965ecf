//! Account input validation.

use thiserror::Error;

/// Smallest accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A rejected input field with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Normalise and check an email address.
///
/// Requires a single `@`, a non-empty local part and a dotted domain.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the `email` field.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();

    let invalid = || ValidationError::new("email", "Please enter a valid email address");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let dotted = domain.split('.').collect::<Vec<_>>();

    if dotted.len() < 2 || dotted.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(email)
}

/// Check password strength.
///
/// # Errors
///
/// Returns a [`ValidationError`] for `field` when the password is too short.
pub fn validate_password(field: &'static str, password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            field,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }

    Ok(())
}

/// Check and trim a display name.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the `full_name` field when the name is blank.
pub fn validate_full_name(full_name: &str) -> Result<String, ValidationError> {
    let full_name = full_name.trim();

    if full_name.is_empty() {
        return Err(ValidationError::new("full_name", "Full name is required"));
    }

    Ok(full_name.to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn accepts_and_normalises_email() -> TestResult {
        assert_eq!(validate_email("  Ada@Example.COM ")?, "ada@example.com");

        Ok(())
    }

    #[test]
    fn rejects_malformed_email() {
        for email in [
            "",
            "ada",
            "@example.com",
            "ada@",
            "ada@example",
            "ada@example.",
            "ada@@example.com",
            "a da@example.com",
        ] {
            let result = validate_email(email);

            assert!(result.is_err(), "{email:?} should be rejected");
            assert_eq!(result.err().map(|e| e.field), Some("email"));
        }
    }

    #[test]
    fn password_needs_eight_characters() {
        assert!(validate_password("password", "1234567").is_err());
        assert!(validate_password("password", "12345678").is_ok());

        let error = validate_password("new_password", "short").err();

        assert_eq!(error.map(|e| e.field), Some("new_password"));
    }

    #[test]
    fn full_name_must_not_be_blank() -> TestResult {
        assert!(validate_full_name("   ").is_err());
        assert_eq!(validate_full_name(" Ada Lovelace ")?, "Ada Lovelace");

        Ok(())
    }
}
