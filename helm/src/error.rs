use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Field-level validation messages keyed by form field name.
///
/// Ordered so inline errors render in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            let message = list
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid value".to_string());
            fields.insert(field.to_string(), message);
        }
        fields
    }
}

/// Every failure surfaced by the client core.
///
/// Payloads are plain strings so the error is `Clone`: a de-duplicated
/// query hands the same failure to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HelmError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HelmError {
    /// Generic message used when a failed response carries no usable `message`.
    pub fn status_message(status: u16) -> String {
        format!("Request failed with status {status}")
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HelmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Text shown to the user inline or in a notification.
    pub fn user_message(&self) -> String {
        match self {
            HelmError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for HelmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            HelmError::Decode(e.to_string())
        } else {
            HelmError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for HelmError {
    fn from(e: serde_json::Error) -> Self {
        HelmError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for HelmError {
    fn from(e: std::io::Error) -> Self {
        HelmError::Storage(e.to_string())
    }
}

impl From<url::ParseError> for HelmError {
    fn from(e: url::ParseError) -> Self {
        HelmError::Config(format!("invalid URL: {e}"))
    }
}

impl From<validator::ValidationErrors> for HelmError {
    fn from(e: validator::ValidationErrors) -> Self {
        HelmError::Validation(e.into())
    }
}

pub type Result<T> = std::result::Result<T, HelmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message_only() {
        let err = HelmError::Api {
            status: 400,
            message: "Email already taken".to_string(),
        };
        assert_eq!(err.to_string(), "Email already taken");
        assert_eq!(err.user_message(), "Email already taken");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = HelmError::Api {
            status: 401,
            message: HelmError::status_message(401),
        };
        assert!(err.is_unauthorized());
        assert!(!HelmError::Transport("refused".into()).is_unauthorized());
    }

    #[test]
    fn test_field_errors_display_is_ordered() {
        let mut fields = FieldErrors::new();
        fields.insert("password", "Password Required");
        fields.insert("email", "Invalid email");
        assert_eq!(
            fields.to_string(),
            "email: Invalid email, password: Password Required"
        );
        assert_eq!(fields.len(), 2);
    }
}
