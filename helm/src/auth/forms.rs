use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::api::dto::{LoginRequest, RegisterRequest};
use crate::error::FieldErrors;

/// Whitespace-only counts as empty.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password Required"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<LoginRequest, FieldErrors> {
        self.validate()?;
        Ok(LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[validate(custom(function = "not_blank", message = "First Name Required"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank", message = "Last Name Required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password Required"))]
    pub password: String,
}

impl SignupForm {
    pub fn check(&self) -> Result<RegisterRequest, FieldErrors> {
        self.validate()?;
        Ok(RegisterRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_login_form_reports_both_fields() {
        let errors = LoginForm::default().check().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(errors.get("password"), Some("Password Required"));
    }

    #[test]
    fn test_malformed_emails_rejected() {
        for email in ["plain", "no-at.example.com", "@missing-user.com", "a@"] {
            let errors = LoginForm::new(email, "pw").check().unwrap_err();
            assert_eq!(errors.get("email"), Some("Invalid email"), "{email}");
            assert!(errors.get("password").is_none());
        }
    }

    #[test]
    fn test_valid_login_form_builds_request() {
        let request = LoginForm::new("a@b.com", "pw").check().unwrap();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.password, "pw");
    }

    #[test]
    fn test_login_password_is_not_trimmed() {
        assert!(LoginForm::new("a@b.com", " ").check().is_ok());
    }

    #[test]
    fn test_signup_blank_fields() {
        let form = SignupForm {
            first_name: "  ".into(),
            last_name: String::new(),
            email: "x@y.io".into(),
            password: "\t".into(),
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors.get("first_name"), Some("First Name Required"));
        assert_eq!(errors.get("last_name"), Some("Last Name Required"));
        assert_eq!(errors.get("password"), Some("Password Required"));
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn test_signup_valid() {
        let form = SignupForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
        };
        let request = form.check().unwrap();
        assert_eq!(request.first_name, "Ada");
    }
}
