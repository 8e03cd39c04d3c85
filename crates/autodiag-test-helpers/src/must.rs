//! Unwrap helpers for test code.
//!
//! Production code never unwraps. Tests that would rather fail loudly than
//! thread a `Result` use these instead of `unwrap()`, and get the caller's
//! location in the panic through `#[track_caller]`.

use std::fmt::Debug;

/// Unwrap a `Result`, panicking with the error on `Err`.
///
/// # Example
///
/// ```rust
/// use autodiag_test_helpers::must;
///
/// let value = must("42".parse::<u32>());
/// assert_eq!(value, 42);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: unexpected Err: {e:?}"),
    }
}

/// Unwrap an `Option`, panicking with `msg` on `None`.
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}

/// Unwrap a `Result` with a context message.
///
/// # Panics
///
/// Panics if the result is `Err`, with the context and error value.
#[track_caller]
pub fn must_with<T, E: Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must_with: {context}: {e:?}"),
    }
}

/// Unwrap the `Err` side, panicking with the value on `Ok`.
///
/// # Panics
///
/// Panics if the result is `Ok`.
#[track_caller]
pub fn must_err<T: Debug, E>(result: Result<T, E>) -> E {
    match result {
        Ok(v) => panic!("must_err: unexpected Ok: {v:?}"),
        Err(e) => e,
    }
}

#[cfg(feature = "mock")]
mod async_helpers {
    use super::*;
    use std::future::Future;

    /// Await a future that returns `Result`, unwrapping with context on error.
    ///
    /// This is the async version of [`must`].
    ///
    /// # Panics
    ///
    /// Panics if the future resolves to `Err`.
    pub async fn must_async<F, T, E>(future: F) -> T
    where
        F: Future<Output = Result<T, E>>,
        E: Debug,
    {
        match future.await {
            Ok(v) => v,
            Err(e) => panic!("must_async: unexpected Err: {e:?}"),
        }
    }
}

#[cfg(feature = "mock")]
pub use async_helpers::must_async;
