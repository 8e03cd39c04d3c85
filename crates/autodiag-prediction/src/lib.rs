//! Fault prediction for the autodiag workspace.
//!
//! A [`PredictionOrchestrator`] takes one [`VehicleState`] snapshot, turns it
//! into an [`InferenceRequest`], invokes an [`InferenceCapability`] exactly
//! once and decodes the answer into a strictly typed [`PredictionResult`].
//! At most one call is in flight at a time.
//!
//! # Modules
//!
//! - [`result`] - [`PredictionResult`], [`Severity`], [`FaultCode`]
//! - [`schema`] - Response schema and strict decoding
//! - [`request`] - Prompt and request construction
//! - [`credential`] - [`ApiKey`] resolution
//! - [`config`] - [`PredictionConfig`]
//! - [`capability`] - The capability trait
//! - [`gemini`] - HTTP implementation of the capability
//! - [`orchestrator`] - The single-flight state machine
//!
//! [`VehicleState`]: autodiag_telemetry::VehicleState

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod capability;
pub mod config;
pub mod credential;
pub mod gemini;
pub mod orchestrator;
pub mod request;
pub mod result;
pub mod schema;

pub use autodiag_errors::{PredictionError, PredictionErrorKind, SchemaViolations};
pub use capability::InferenceCapability;
pub use config::PredictionConfig;
pub use credential::{API_KEY_ENV, ApiKey, PLACEHOLDER_API_KEY};
pub use gemini::GeminiClient;
pub use orchestrator::{PredictionOrchestrator, PredictionPermit, PredictionStatus};
pub use request::{InferenceRequest, build_prompt};
pub use result::{FaultCode, PredictionResult, Severity};
pub use schema::{decode_prediction, response_schema};
