//! Vehicle diagnostics daemon.
//!
//! Wires a [`TelemetrySimulator`](autodiag_telemetry::TelemetrySimulator)
//! and a [`PredictionOrchestrator`](autodiag_prediction::PredictionOrchestrator)
//! into a [`DiagnosticsService`] that ticks on a timer, accepts the two
//! console commands and renders snapshots and prediction status as text or
//! JSON.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod console;
pub mod render;
pub mod service;

pub use config::ServiceConfig;
pub use console::{HELP, Input};
pub use render::OutputFormat;
pub use service::{Command, CommandOutcome, DiagnosticsService};
