//! Prelude module for convenient error handling imports.
//!
//! ```
//! use autodiag_errors::prelude::*;
//!
//! fn history_capacity(value: usize) -> Result<usize> {
//!     validate!(value > 0, ValidationError::constraint("history capacity must be positive"));
//!     Ok(value)
//! }
//!
//! assert!(history_capacity(0).is_err());
//! ```

pub use crate::{
    Result,
    common::{DiagnosticsError, ErrorCategory, ErrorContext, ErrorSeverity, ResultExt},
    prediction::{PredictionError, PredictionErrorKind},
    validation::{SchemaViolations, ValidationError},
};

pub use crate::{validate, validate_range};

/// Return early with `$error` unless `$condition` holds.
#[macro_export]
macro_rules! validate {
    ($condition:expr, $error:expr) => {
        if !$condition {
            return Err($error.into());
        }
    };
}

/// Return early with an out of range error unless `$min <= $value <= $max`.
///
/// NaN values fail the check.
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $value:expr, $min:expr, $max:expr) => {
        if !($value >= $min && $value <= $max) {
            return Err($crate::ValidationError::out_of_range($field, $value, $min, $max).into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_macro() {
        fn check() -> Result<()> {
            validate!(false, ValidationError::required("model"));
            Ok(())
        }
        assert!(matches!(check(), Err(DiagnosticsError::Validation(_))));
    }

    #[test]
    fn test_validate_range_macro() {
        fn check(value: f64) -> Result<()> {
            validate_range!("temperature", value, 0.0_f64, 2.0_f64);
            Ok(())
        }
        assert!(check(0.2).is_ok());
        assert!(check(2.5).is_err());
        assert!(check(f64::NAN).is_err());
    }
}
