//! Validation errors raised by value object constructors.

use thiserror::Error;

/// Why a value object refused its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            ValidationError::empty_field("user_id").to_string(),
            "Field 'user_id' cannot be empty"
        );
        assert_eq!(
            ValidationError::out_of_range("percentage", 0, 100, 150).to_string(),
            "Field 'percentage' must be between 0 and 100, got 150"
        );
    }

    #[test]
    fn invalid_format_carries_reason() {
        let err = ValidationError::invalid_format("document_id", "must not contain path separators");
        assert!(matches!(err, ValidationError::InvalidFormat { ref reason, .. } if reason.contains("separators")));
    }
}
