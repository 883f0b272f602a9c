//! Input validation utilities
//!
//! Only presence is checked. Anything else is for the backend to judge.

use thiserror::Error;

use crate::models::{LoginForm, RegistrationForm};

/// Missing required form fields
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email and password are required.")]
    MissingLoginFields,

    #[error("Name, email, and password are required.")]
    MissingRegistrationFields,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate login form
pub fn validate_login(form: &LoginForm) -> Result<(), ValidationError> {
    if is_blank(&form.email) || form.password.is_empty() {
        return Err(ValidationError::MissingLoginFields);
    }

    Ok(())
}

/// Validate registration form
pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationError> {
    if is_blank(&form.name) || is_blank(&form.email) || form.password.is_empty() {
        return Err(ValidationError::MissingRegistrationFields);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login() {
        assert_eq!(validate_login(&LoginForm::new("a@b.c", "pw")), Ok(()));
        assert_eq!(
            validate_login(&LoginForm::new("", "pw")),
            Err(ValidationError::MissingLoginFields)
        );
        assert_eq!(
            validate_login(&LoginForm::new("   ", "pw")),
            Err(ValidationError::MissingLoginFields)
        );
        assert_eq!(
            validate_login(&LoginForm::new("a@b.c", "")),
            Err(ValidationError::MissingLoginFields)
        );
    }

    #[test]
    fn test_validate_registration() {
        assert_eq!(
            validate_registration(&RegistrationForm::new("Ann", "a@b.c", "pw")),
            Ok(())
        );
        for form in [
            RegistrationForm::new("", "a@b.c", "pw"),
            RegistrationForm::new("Ann", "", "pw"),
            RegistrationForm::new("Ann", "a@b.c", ""),
        ] {
            assert_eq!(
                validate_registration(&form),
                Err(ValidationError::MissingRegistrationFields)
            );
        }
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::MissingLoginFields.to_string(),
            "Email and password are required."
        );
        assert_eq!(
            ValidationError::MissingRegistrationFields.to_string(),
            "Name, email, and password are required."
        );
    }
}
