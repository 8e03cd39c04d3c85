//! Centralized error types for autodiag
//!
//! This crate provides the error taxonomy shared by the telemetry simulator,
//! the prediction orchestrator and the service binary.
//!
//! # Architecture
//!
//! - [`common`]: Top-level error type, classification and context helpers
//! - [`prediction`]: Errors reported by a prediction call
//! - [`validation`]: Field-level validation errors and violation sets
//!
//! Every prediction failure is one of three classified kinds
//! (configuration, transport, schema validation) plus the single-flight
//! refusal. None of them are process-fatal and none trigger a retry.
//!
//! # Example
//!
//! ```
//! use autodiag_errors::prelude::*;
//!
//! fn check_confidence(value: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&value) {
//!         return Err(ValidationError::out_of_range("confidence", value, 0.0, 1.0).into());
//!     }
//!     Ok(value)
//! }
//!
//! assert!(check_confidence(1.4).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod common;
pub mod prediction;
pub mod prelude;
pub mod validation;

pub use common::{DiagnosticsError, ErrorCategory, ErrorContext, ErrorSeverity, ResultExt};
pub use prediction::{PredictionError, PredictionErrorKind};
pub use validation::{SchemaViolations, ValidationError};

/// A specialized `Result` type for autodiag operations.
pub type Result<T> = std::result::Result<T, DiagnosticsError>;
