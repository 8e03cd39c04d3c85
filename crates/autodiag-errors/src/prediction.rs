//! Errors reported by a prediction call.
//!
//! A prediction fails for exactly one of three reasons, each reported to the
//! caller as a tagged failure with a human-readable message:
//!
//! - [`PredictionError::Configuration`]: the credential is missing or still the
//!   placeholder. Detected before any network interaction.
//! - [`PredictionError::Transport`]: the capability is unreachable, overloaded
//!   or rejected the request. A manual retry may succeed.
//! - [`PredictionError::SchemaValidation`]: the capability answered, but the
//!   payload failed decoding or a domain check.
//!
//! [`PredictionError::AlreadyRunning`] is the single-flight refusal: it is
//! returned to the second caller and never recorded as the outcome of the call
//! that is still in flight.

use core::fmt;

use crate::common::{ErrorCategory, ErrorSeverity};
use crate::validation::{SchemaViolations, ValidationError};

/// Classified failure of a single prediction call.
///
/// # Examples
///
/// ```
/// use autodiag_errors::{PredictionError, PredictionErrorKind, ErrorCategory};
///
/// let err = PredictionError::transport("503 Service Unavailable");
/// assert_eq!(err.kind(), PredictionErrorKind::Transport);
/// assert_eq!(err.category(), ErrorCategory::Transport);
/// assert!(err.is_retryable());
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    /// Credential missing, blank or still the placeholder value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Capability unreachable, overloaded or rejecting the request
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response decoded badly or violated the result schema
    #[error("Schema validation error: {0}")]
    SchemaValidation(SchemaViolations),

    /// Another prediction is still in flight
    #[error("A prediction is already running")]
    AlreadyRunning,
}

impl PredictionError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        PredictionError::Configuration(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        PredictionError::Transport(msg.into())
    }

    /// Create a schema validation error from a single violation.
    pub fn schema(violation: ValidationError) -> Self {
        PredictionError::SchemaValidation(SchemaViolations::single(violation))
    }

    /// Create a schema validation error for a payload that could not be decoded at all.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::schema(ValidationError::invalid_format("response", reason))
    }

    /// Tag identifying the failure class.
    pub fn kind(&self) -> PredictionErrorKind {
        match self {
            PredictionError::Configuration(_) => PredictionErrorKind::Configuration,
            PredictionError::Transport(_) => PredictionErrorKind::Transport,
            PredictionError::SchemaValidation(_) => PredictionErrorKind::SchemaValidation,
            PredictionError::AlreadyRunning => PredictionErrorKind::AlreadyRunning,
        }
    }

    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PredictionError::Configuration(_) => ErrorCategory::Configuration,
            PredictionError::Transport(_) => ErrorCategory::Transport,
            PredictionError::SchemaValidation(_) => ErrorCategory::SchemaValidation,
            PredictionError::AlreadyRunning => ErrorCategory::Concurrency,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PredictionError::AlreadyRunning => ErrorSeverity::Info,
            PredictionError::Transport(_) => ErrorSeverity::Warning,
            PredictionError::Configuration(_) | PredictionError::SchemaValidation(_) => {
                ErrorSeverity::Error
            }
        }
    }

    /// Whether a manual retry without changing anything may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PredictionError::Transport(_) | PredictionError::AlreadyRunning
        )
    }

    /// Schema violations carried by this error, if any.
    pub fn violations(&self) -> Option<&SchemaViolations> {
        match self {
            PredictionError::SchemaValidation(v) => Some(v),
            _ => None,
        }
    }
}

/// Failure class of a [`PredictionError`], as surfaced to a rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionErrorKind {
    /// See [`PredictionError::Configuration`]
    Configuration,
    /// See [`PredictionError::Transport`]
    Transport,
    /// See [`PredictionError::SchemaValidation`]
    SchemaValidation,
    /// See [`PredictionError::AlreadyRunning`]
    AlreadyRunning,
}

impl fmt::Display for PredictionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionErrorKind::Configuration => write!(f, "configuration"),
            PredictionErrorKind::Transport => write!(f, "transport"),
            PredictionErrorKind::SchemaValidation => write!(f, "schema_validation"),
            PredictionErrorKind::AlreadyRunning => write!(f, "already_running"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            PredictionError::configuration("no key").kind(),
            PredictionErrorKind::Configuration
        );
        assert_eq!(
            PredictionError::malformed("expected value at line 1").kind(),
            PredictionErrorKind::SchemaValidation
        );
        assert_eq!(
            PredictionError::AlreadyRunning.kind(),
            PredictionErrorKind::AlreadyRunning
        );
    }

    #[test]
    fn test_configuration_is_not_retryable() {
        assert!(!PredictionError::configuration("no key").is_retryable());
        assert!(!PredictionError::malformed("truncated").is_retryable());
        assert!(PredictionError::transport("429 Too Many Requests").is_retryable());
    }

    #[test]
    fn test_schema_message_lists_every_violation() {
        let mut violations = SchemaViolations::default();
        violations.push(ValidationError::invalid_enum(
            "severity",
            "Extreme",
            "Low, Medium, High, Critical",
        ));
        violations.push(ValidationError::out_of_range("confidence", 1.4, 0.0, 1.0));
        let err = PredictionError::SchemaValidation(violations);

        let msg = err.to_string();
        assert!(msg.contains("Extreme"));
        assert!(msg.contains("1.4"));
        assert_eq!(err.violations().map(SchemaViolations::len), Some(2));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PredictionErrorKind::SchemaValidation.to_string(), "schema_validation");
    }
}
