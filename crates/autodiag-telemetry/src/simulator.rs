//! Stateful owner of the vehicle state.

use std::time::Duration;

use autodiag_errors::ValidationError;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::random::{RandomSource, RngSource};
use crate::state::VehicleState;
use crate::tick::tick;

/// Holds the current [`VehicleState`] and advances it one tick at a time.
///
/// The simulator is the only writer of its state. Readers take a
/// [`snapshot`](Self::snapshot), which is an owned clone and never observes a
/// half-applied tick.
#[derive(Debug)]
pub struct TelemetrySimulator<R = RngSource<StdRng>> {
    config: SimulationConfig,
    state: VehicleState,
    random: R,
    ticks: u64,
}

impl TelemetrySimulator {
    /// Simulator seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn new(config: SimulationConfig) -> Result<Self, ValidationError> {
        Self::with_random(config, RngSource::from_os_rng())
    }

    /// Reproducible simulator: the same seed yields the same run.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, ValidationError> {
        Self::with_random(config, RngSource::seeded(seed))
    }
}

impl<R: RandomSource> TelemetrySimulator<R> {
    /// Simulator driven by an arbitrary random source.
    ///
    /// The initial history consumes the first `history_capacity` draws.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn with_random(config: SimulationConfig, mut random: R) -> Result<Self, ValidationError> {
        config.validate()?;
        let state = VehicleState::initial(&config, &mut random);
        Ok(Self {
            config,
            state,
            random,
            ticks: 0,
        })
    }

    /// Advance one tick and return the new state.
    pub fn tick(&mut self) -> &VehicleState {
        self.state = tick(&self.state, &self.config, &mut self.random);
        self.ticks = self.ticks.saturating_add(1);
        debug!(
            tick = self.ticks,
            rpm = self.state.rpm,
            engine_temp = self.state.engine_temp,
            oil_pressure = self.state.oil_pressure,
            fuel_level = self.state.fuel_level,
            "Simulation tick"
        );
        &self.state
    }

    /// Force the fault profile onto the current state.
    ///
    /// Takes effect immediately; the next tick walks from the fault values and
    /// clamps them back into range.
    pub fn inject_fault(&mut self) {
        self.state.apply_fault(&self.config.fault);
        info!(
            engine_temp = self.state.engine_temp,
            oil_pressure = self.state.oil_pressure,
            battery_voltage = self.state.battery_voltage,
            tire_pressure = self.state.tire_pressure,
            "Fault injected"
        );
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> VehicleState {
        self.state.clone()
    }

    /// Borrow the current state.
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Ticks applied since construction.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Configured tick cadence.
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;

    #[test]
    fn test_same_seed_same_run() -> Result<(), ValidationError> {
        let mut a = TelemetrySimulator::seeded(SimulationConfig::default(), 9)?;
        let mut b = TelemetrySimulator::seeded(SimulationConfig::default(), 9)?;
        for _ in 0..50 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.tick_count(), 50);
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::default().with_tick_interval_ms(0);
        assert!(TelemetrySimulator::seeded(config, 1).is_err());
    }

    #[test]
    fn test_snapshot_is_detached() -> Result<(), ValidationError> {
        let mut sim =
            TelemetrySimulator::with_random(SimulationConfig::default(), FixedRandom::new(0.5))?;
        let before = sim.snapshot();
        sim.tick();
        assert_ne!(before, sim.snapshot());
        assert_eq!(before.fuel_level.to_bits(), 75.0_f64.to_bits());
        Ok(())
    }

    #[test]
    fn test_fault_then_tick() -> Result<(), ValidationError> {
        let mut sim =
            TelemetrySimulator::with_random(SimulationConfig::default(), FixedRandom::new(0.5))?;
        sim.inject_fault();
        assert_eq!(sim.state().engine_temp.to_bits(), 115.0_f64.to_bits());
        assert_eq!(sim.state().oil_pressure.to_bits(), 25.0_f64.to_bits());

        let state = sim.tick();
        assert!((state.oil_pressure - 30.0).abs() < 1e-9);
        assert!((state.tire_pressure - 26.0).abs() < 1e-9);
        Ok(())
    }
}
