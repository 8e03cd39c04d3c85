//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use autodiag_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_err, must_some, must_with};
pub use crate::{assert_approx_eq, assert_contains, assert_err_kind, assert_in_range};

#[cfg(feature = "mock")]
pub use crate::must::must_async;

#[cfg(feature = "mock")]
pub use crate::mock::MockCapability;

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    generate_content_envelope, prediction_json_with, valid_prediction, valid_prediction_json,
};

/// Result type for tests that propagate errors with `?`.
pub type TestResult = Result<(), Box<dyn std::error::Error>>;
