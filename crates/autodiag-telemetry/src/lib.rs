//! Simulated vehicle telemetry.
//!
//! Produces a plausible multi-channel sensor signal by evolving each channel
//! as a bounded random walk, keeps a rolling window of recent rpm samples and
//! can force a synthetic fault onto the state.
//!
//! # Modules
//!
//! - [`config`] - Walk parameters, initial state, fault profile
//! - [`random`] - Injectable unit-interval random sources
//! - [`state`] - [`VehicleState`] and its [`RpmHistory`]
//! - [`tick`](mod@tick) - The pure transition function
//! - [`simulator`] - [`TelemetrySimulator`], the single writer of the state
//! - [`gauge`] - Channel metadata and gauge level classification
//!
//! # Example
//!
//! ```
//! use autodiag_telemetry::{SimulationConfig, TelemetrySimulator};
//!
//! let mut sim = TelemetrySimulator::seeded(SimulationConfig::default(), 7)?;
//! for _ in 0..10 {
//!     sim.tick();
//! }
//! let snapshot = sim.snapshot();
//! assert_eq!(snapshot.rpm_history.len(), 20);
//! assert!(snapshot.fuel_level < 75.0);
//! # Ok::<(), autodiag_errors::ValidationError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod gauge;
pub mod random;
pub mod simulator;
pub mod state;
pub mod tick;

pub use config::{
    DEFAULT_TICK_INTERVAL_MS, FaultProfile, InitialState, MAX_HISTORY_CAPACITY,
    RPM_HISTORY_CAPACITY, RandomWalk, RpmWalk, SimulationConfig, UniformDraw,
};
pub use gauge::{Channel, GaugeLevel, GaugeReading, gauge_readings};
pub use random::{FixedRandom, RandomSource, RngSource, SequenceRandom};
pub use simulator::TelemetrySimulator;
pub use state::{RpmHistory, RpmSample, SampleLabel, VehicleState};
pub use tick::tick;
