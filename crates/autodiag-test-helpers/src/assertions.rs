//! Assertion macros for telemetry and prediction tests.

/// Assert that two floating-point values are approximately equal.
///
/// # Example
///
/// ```rust
/// use autodiag_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(74.9_f64, 75.0 - 0.1, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`: {}",
                left, right, diff, tolerance, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that a value lies in a range.
///
/// # Example
///
/// ```rust
/// use autodiag_test_helpers::assert_in_range;
///
/// assert_in_range!(90.25, 85.0..=120.0);
/// ```
#[macro_export]
macro_rules! assert_in_range {
    ($value:expr, $range:expr $(,)?) => {
        let value = $value;
        let range = $range;
        if !range.contains(&value) {
            panic!("assertion failed: value {:?} is not in range {:?}", value, range);
        }
    };
    ($value:expr, $range:expr, $($arg:tt)+) => {
        let value = $value;
        let range = $range;
        if !range.contains(&value) {
            panic!(
                "assertion failed: value {:?} is not in range {:?}: {}",
                value, range, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that a string contains a substring.
///
/// # Example
///
/// ```rust
/// use autodiag_test_helpers::assert_contains;
///
/// assert_contains!("- Engine RPM: 800 RPM", "800 RPM");
/// ```
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr $(,)?) => {
        let haystack = $haystack;
        let needle = $needle;
        if !haystack.contains(needle) {
            panic!(
                "assertion failed: string does not contain substring\n  haystack: `{:?}`\n  needle: `{:?}`",
                haystack, needle
            );
        }
    };
}

/// Assert that a result failed with the given error kind, returning the error.
///
/// Works with any error type exposing `kind()`.
#[macro_export]
macro_rules! assert_err_kind {
    ($result:expr, $kind:expr $(,)?) => {
        match $result {
            Err(e) => {
                if e.kind() != $kind {
                    panic!(
                        "assertion failed: expected error kind {:?}, got {:?} ({})",
                        $kind,
                        e.kind(),
                        e
                    );
                }
                e
            }
            Ok(v) => panic!("assertion failed: expected Err({:?}), got Ok({:?})", $kind, v),
        }
    };
}
