//! Input validation error types.
//!
//! This module provides error types for validation failures (range checks,
//! format checks, enum membership) and [`SchemaViolations`], the set of every
//! violation found while checking one capability response.

use core::fmt;

use crate::common::ErrorSeverity;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value out of range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Minimum allowed value
        min: String,
        /// Maximum allowed value
        max: String,
    },

    /// Value is required but missing
    #[error("Required field '{0}' is missing")]
    Required(String),

    /// String value is present but empty
    #[error("Field '{0}' must not be empty")]
    Empty(String),

    /// Numeric value is NaN or infinite
    #[error("Field '{0}' must be a finite number")]
    NotFinite(String),

    /// Invalid format
    #[error("Invalid format for field '{field}': {reason}")]
    InvalidFormat {
        /// Field name
        field: String,
        /// Reason for the format error
        reason: String,
    },

    /// Invalid enum value
    #[error("Invalid value '{value}' for field '{field}', expected one of: {expected}")]
    InvalidEnumValue {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Expected values
        expected: String,
    },

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Name of the offending field, when the violation is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidEnumValue { field, .. } => Some(field),
            ValidationError::Required(field)
            | ValidationError::Empty(field)
            | ValidationError::NotFinite(field) => Some(field),
            ValidationError::ConstraintViolation(_) => None,
        }
    }

    /// Create an out of range error for a numeric value.
    pub fn out_of_range<T: fmt::Debug>(field: impl Into<String>, value: T, min: T, max: T) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value: format!("{value:?}"),
            min: format!("{min:?}"),
            max: format!("{max:?}"),
        }
    }

    /// Create a required field error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required(field.into())
    }

    /// Create an empty string error.
    pub fn empty(field: impl Into<String>) -> Self {
        ValidationError::Empty(field.into())
    }

    /// Create a non-finite number error.
    pub fn not_finite(field: impl Into<String>) -> Self {
        ValidationError::NotFinite(field.into())
    }

    /// Create an invalid format error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid enum value error.
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidEnumValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a constraint violation error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        ValidationError::ConstraintViolation(msg.into())
    }
}

/// Every violation found while checking one payload, in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaViolations(Vec<ValidationError>);

impl SchemaViolations {
    /// A set holding exactly one violation.
    pub fn single(violation: ValidationError) -> Self {
        Self(vec![violation])
    }

    /// Record another violation.
    pub fn push(&mut self, violation: ValidationError) {
        self.0.push(violation);
    }

    /// Number of violations recorded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recorded violations.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True when a violation was recorded against `field`.
    pub fn touches(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field() == Some(field))
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no violations");
        }
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaViolations {}

impl From<ValidationError> for SchemaViolations {
    fn from(violation: ValidationError) -> Self {
        Self::single(violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_out_of_range() {
        let err = ValidationError::out_of_range("confidence", 1.4_f64, 0.0, 1.0);
        let msg = err.to_string();
        assert!(msg.contains("confidence"));
        assert!(msg.contains("1.4"));
    }

    #[test]
    fn test_validation_error_required() {
        let err = ValidationError::required("faultCode");
        assert_eq!(err.to_string(), "Required field 'faultCode' is missing");
    }

    #[test]
    fn test_validation_error_invalid_enum() {
        let err = ValidationError::invalid_enum("severity", "Extreme", "Low, Medium, High, Critical");
        let msg = err.to_string();
        assert!(msg.contains("Extreme"));
        assert!(msg.contains("Low, Medium, High, Critical"));
        assert_eq!(err.field(), Some("severity"));
    }

    #[test]
    fn test_violations_join_in_order() {
        let mut violations = SchemaViolations::default();
        assert!(violations.is_empty());
        violations.push(ValidationError::empty("recommendation"));
        violations.push(ValidationError::not_finite("confidence"));

        assert_eq!(
            violations.to_string(),
            "Field 'recommendation' must not be empty; Field 'confidence' must be a finite number"
        );
        assert!(violations.touches("confidence"));
        assert!(!violations.touches("severity"));
    }

    #[test]
    fn test_validation_error_severity() {
        assert_eq!(
            ValidationError::required("test").severity(),
            ErrorSeverity::Error
        );
    }
}
