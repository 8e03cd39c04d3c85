//! Common error types and utilities used across all autodiag crates.
//!
//! This module provides the top-level error enum that wraps the sub-errors,
//! along with error classification, severity levels, and a context trait.

use core::fmt;

use crate::{PredictionError, ValidationError};

/// Top-level error type that can wrap all autodiag sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    /// Prediction call failures
    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors outside of a prediction call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl DiagnosticsError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DiagnosticsError::Prediction(e) => e.category(),
            DiagnosticsError::Validation(_) => ErrorCategory::Validation,
            DiagnosticsError::Io(_) => ErrorCategory::Io,
            DiagnosticsError::Config(_) => ErrorCategory::Configuration,
            DiagnosticsError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DiagnosticsError::Prediction(e) => e.severity(),
            DiagnosticsError::Validation(e) => e.severity(),
            DiagnosticsError::Io(_) | DiagnosticsError::Config(_) | DiagnosticsError::Other(_) => {
                ErrorSeverity::Error
            }
        }
    }

    /// Check if this error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        DiagnosticsError::Config(msg.into())
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        DiagnosticsError::Other(msg.into())
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Missing or placeholder credential, invalid settings
    Configuration = 0,
    /// Capability unreachable, overloaded or rejecting the request
    Transport = 1,
    /// Capability response failed decoding or domain checks
    SchemaValidation = 2,
    /// Call refused because another one is in flight
    Concurrency = 3,
    /// Input validation errors
    Validation = 4,
    /// I/O errors
    Io = 5,
    /// Other errors
    Other = 255,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "Configuration"),
            ErrorCategory::Transport => write!(f, "Transport"),
            ErrorCategory::SchemaValidation => write!(f, "SchemaValidation"),
            ErrorCategory::Concurrency => write!(f, "Concurrency"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Io => write!(f, "IO"),
            ErrorCategory::Other => write!(f, "Other"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, system may be in unstable state
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Context information attached to an error on its way up.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation that was being performed
    pub operation: String,
    /// Additional context key-value pairs
    pub context: Vec<(String, String)>,
}

impl ErrorContext {
    /// Create a new error context for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            context: Vec::new(),
        }
    }

    /// Add a context key-value pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation: {}", self.operation)?;
        for (key, value) in &self.context {
            write!(f, ", {key}: {value}")?;
        }
        Ok(())
    }
}

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, ctx: ErrorContext) -> Result<T, DiagnosticsError>;

    /// Add context with an operation name.
    fn with_context(self, operation: impl Into<String>) -> Result<T, DiagnosticsError>;
}

impl<T, E: Into<DiagnosticsError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, ctx: ErrorContext) -> Result<T, DiagnosticsError> {
        self.map_err(|e| {
            let err: DiagnosticsError = e.into();
            DiagnosticsError::Other(format!("{ctx}: {err}"))
        })
    }

    fn with_context(self, operation: impl Into<String>) -> Result<T, DiagnosticsError> {
        self.context(ErrorContext::new(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Transport.to_string(), "Transport");
        assert_eq!(ErrorCategory::SchemaValidation.to_string(), "SchemaValidation");
        assert_eq!(ErrorCategory::Io.to_string(), "IO");
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
        assert!(ErrorSeverity::Error > ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning > ErrorSeverity::Info);
    }

    #[test]
    fn test_error_context() {
        let ctx = ErrorContext::new("load_config")
            .with("path", "autodiag.json")
            .with("section", "simulation");
        assert!(ctx.to_string().contains("load_config"));
        assert!(ctx.to_string().contains("section: simulation"));
    }

    #[test]
    fn test_diagnostics_error_category() {
        let err: DiagnosticsError = PredictionError::transport("connection refused").into();
        assert_eq!(err.category(), ErrorCategory::Transport);

        let err = DiagnosticsError::config("tick interval must be positive");
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_prediction_errors_are_recoverable() {
        let err: DiagnosticsError = PredictionError::AlreadyRunning.into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), ValidationError> =
            Err(ValidationError::required("model"));
        let with_ctx = result.with_context("load_prediction_config");
        let msg = match with_ctx {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        };
        assert!(msg.contains("load_prediction_config"));
        assert!(msg.contains("model"));
    }
}
