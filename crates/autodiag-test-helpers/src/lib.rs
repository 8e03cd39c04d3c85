//! Shared test utilities for autodiag.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with `#[track_caller]`
//! - [`assertions`] - Float, range and error-kind assertion macros
//! - [`mock`] - Scripted inference capability with call counting and gating
//! - [`fixtures`] - Canned capability payloads
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! autodiag-test-helpers = { workspace = true }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "fixtures")]
pub mod fixtures;

pub use must::*;
