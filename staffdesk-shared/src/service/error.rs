//! Service error taxonomy

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as it appears in the request body
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error for a required field that was absent or empty
    pub fn missing(field: &str) -> Self {
        Self::new(field, format!("{} is required", field))
    }

    fn is_missing(&self) -> bool {
        self.message.ends_with(" is required")
    }
}

/// Errors returned by services
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// One or more input fields were rejected
    #[error("{}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// The write collides with existing data
    #[error("{0}")]
    Conflict(String),

    /// No authenticated account
    #[error("Authentication required")]
    Unauthenticated,

    /// Login failed; deliberately does not say why
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Target does not exist for this caller
    #[error("{0}")]
    NotFound(String),

    /// Store or other unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldError::new(field, message)])
    }
}

fn summarize(errors: &[FieldError]) -> String {
    let missing: Vec<&str> = errors
        .iter()
        .filter(|e| e.is_missing())
        .map(|e| e.field.as_str())
        .collect();

    if !missing.is_empty() && missing.len() == errors.len() {
        return format!("Missing required fields: {}", missing.join(", "));
    }

    match errors {
        [] => "Validation failed".to_string(),
        [only] => only.message.clone(),
        _ => format!(
            "Validation failed: {}",
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { field } => {
                ServiceError::Conflict(format!("{} is already in use", field))
            }
            StoreError::CheckViolation(constraint) => {
                ServiceError::Validation(vec![FieldError::new(
                    "salary",
                    format!("Rejected by constraint {}", constraint),
                )])
            }
            StoreError::Backend(msg) => ServiceError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message() {
        let err = ServiceError::Validation(vec![
            FieldError::missing("firstName"),
            FieldError::missing("salary"),
        ]);
        assert_eq!(err.to_string(), "Missing required fields: firstName, salary");
    }

    #[test]
    fn test_mixed_validation_message() {
        let err = ServiceError::Validation(vec![
            FieldError::missing("firstName"),
            FieldError::new("email", "email must be a valid email address"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: firstName is required; email must be a valid email address"
        );

        let single = ServiceError::field("status", "status must be Active or Inactive");
        assert_eq!(single.to_string(), "status must be Active or Inactive");
    }

    #[test]
    fn test_from_store_error() {
        let err: ServiceError = StoreError::UniqueViolation {
            field: "email".to_string(),
        }
        .into();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err: ServiceError = StoreError::Backend("down".to_string()).into();
        assert_eq!(err, ServiceError::Internal("down".to_string()));
    }
}
