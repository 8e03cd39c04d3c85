//! Named simulation constants and the configuration that carries them.
//!
//! Every constant that shapes the simulated signal lives here: the tick
//! cadence, the history window, the random-walk bias/magnitude/range for each
//! channel, the initial state and the synthetic fault profile. The defaults
//! reproduce the reference dashboard; a service can override any of them.

use std::time::Duration;

use autodiag_errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Design cadence of the simulation tick.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2000;

/// Number of rpm samples kept in the rolling history.
pub const RPM_HISTORY_CAPACITY: usize = 20;

/// Largest history window a configuration may ask for.
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

/// Fuel consumed per tick, in percentage points.
pub const FUEL_BURN_PER_TICK: f64 = 0.1;

/// Engine temperature walk; biased upward so the engine drifts hot over time.
pub const ENGINE_TEMP_WALK: RandomWalk = RandomWalk::new(0.45, 5.0, 85.0, 120.0);

/// Oil pressure walk (unbiased).
pub const OIL_PRESSURE_WALK: RandomWalk = RandomWalk::new(0.5, 5.0, 30.0, 80.0);

/// Tire pressure walk (unbiased).
pub const TIRE_PRESSURE_WALK: RandomWalk = RandomWalk::new(0.5, 1.0, 25.0, 45.0);

/// Engine rpm walk, floored at idle and without a ceiling.
pub const RPM_WALK: RpmWalk = RpmWalk {
    bias: 0.5,
    magnitude: 500.0,
    floor: 700.0,
};

/// Battery voltage is redrawn each tick from `[12.4, 12.8)`.
pub const BATTERY_VOLTAGE_DRAW: UniformDraw = UniformDraw {
    min: 12.4,
    span: 0.4,
};

/// Bounded random walk: `next = clamp(min, max, prev + (draw - bias) * magnitude)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomWalk {
    /// Subtracted from the unit draw; 0.5 is unbiased, lower drifts upward
    pub bias: f64,
    /// Step scale
    pub magnitude: f64,
    /// Lower clamp
    pub min: f64,
    /// Upper clamp
    pub max: f64,
}

impl RandomWalk {
    /// Create a walk from its four parameters.
    pub const fn new(bias: f64, magnitude: f64, min: f64, max: f64) -> Self {
        Self {
            bias,
            magnitude,
            min,
            max,
        }
    }

    /// Advance `prev` by one step using a unit draw in `[0, 1)`.
    pub fn step(&self, prev: f64, draw: f64) -> f64 {
        self.clamp(prev + (draw - self.bias) * self.magnitude)
    }

    /// Clamp a value into `[min, max]`.
    ///
    /// Unlike `f64::clamp` this never panics; a validated walk has `min <= max`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// True when `value` lies inside the walk's range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, field: &str) -> Result<(), ValidationError> {
        if ![self.bias, self.magnitude, self.min, self.max]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ValidationError::not_finite(field));
        }
        if self.min > self.max {
            return Err(ValidationError::constraint(format!(
                "{field}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if self.magnitude < 0.0 {
            return Err(ValidationError::out_of_range(
                format!("{field}.magnitude"),
                self.magnitude,
                0.0,
                f64::MAX,
            ));
        }
        Ok(())
    }
}

/// Rpm walk: like [`RandomWalk`] but with only a floor.
///
/// Near the floor the walk is not symmetric around the previous value, since
/// every downward step that would cross it lands exactly on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RpmWalk {
    /// Subtracted from the unit draw
    pub bias: f64,
    /// Step scale
    pub magnitude: f64,
    /// Idle floor
    pub floor: f64,
}

impl RpmWalk {
    /// Advance `prev` by one step using a unit draw in `[0, 1)`.
    pub fn step(&self, prev: f64, draw: f64) -> f64 {
        (prev + (draw - self.bias) * self.magnitude).max(self.floor)
    }
}

/// Memoryless uniform draw from `[min, min + span)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformDraw {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Width of the interval
    pub span: f64,
}

impl UniformDraw {
    /// Map a unit draw onto the interval.
    pub fn sample(&self, draw: f64) -> f64 {
        self.min + draw * self.span
    }
}

/// Values the simulator starts from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitialState {
    /// Engine temperature, degrees C
    pub engine_temp: f64,
    /// Oil pressure, PSI
    pub oil_pressure: f64,
    /// Engine speed
    pub rpm: f64,
    /// Fuel level, percent
    pub fuel_level: f64,
    /// Battery voltage, V
    pub battery_voltage: f64,
    /// Tire pressure, PSI
    pub tire_pressure: f64,
    /// Base rpm of the seeded history samples
    pub history_base_rpm: f64,
    /// Each seeded history sample adds `draw * history_jitter_rpm`
    pub history_jitter_rpm: f64,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            engine_temp: 90.0,
            oil_pressure: 40.0,
            rpm: 800.0,
            fuel_level: 75.0,
            battery_voltage: 12.6,
            tire_pressure: 32.0,
            history_base_rpm: 800.0,
            history_jitter_rpm: 100.0,
        }
    }
}

/// Out-of-range values forced by fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaultProfile {
    /// Engine temperature, degrees C
    pub engine_temp: f64,
    /// Oil pressure, PSI
    pub oil_pressure: f64,
    /// Battery voltage, V
    pub battery_voltage: f64,
    /// Tire pressure, PSI
    pub tire_pressure: f64,
}

impl Default for FaultProfile {
    fn default() -> Self {
        Self {
            engine_temp: 115.0,
            oil_pressure: 25.0,
            battery_voltage: 11.9,
            tire_pressure: 26.0,
        }
    }
}

/// Simulation configuration.
///
/// Missing fields in a serialized config fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Tick cadence in milliseconds
    pub tick_interval_ms: u64,
    /// Rolling rpm history window
    pub history_capacity: usize,
    /// Starting values
    pub initial: InitialState,
    /// Rpm dynamics
    pub rpm: RpmWalk,
    /// Engine temperature dynamics
    pub engine_temp: RandomWalk,
    /// Oil pressure dynamics
    pub oil_pressure: RandomWalk,
    /// Tire pressure dynamics
    pub tire_pressure: RandomWalk,
    /// Fuel consumed per tick
    pub fuel_burn_per_tick: f64,
    /// Battery voltage draw
    pub battery_voltage: UniformDraw,
    /// Synthetic fault values
    pub fault: FaultProfile,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            history_capacity: RPM_HISTORY_CAPACITY,
            initial: InitialState::default(),
            rpm: RPM_WALK,
            engine_temp: ENGINE_TEMP_WALK,
            oil_pressure: OIL_PRESSURE_WALK,
            tire_pressure: TIRE_PRESSURE_WALK,
            fuel_burn_per_tick: FUEL_BURN_PER_TICK,
            battery_voltage: BATTERY_VOLTAGE_DRAW,
            fault: FaultProfile::default(),
        }
    }
}

impl SimulationConfig {
    /// Fuel level bounds.
    pub const FUEL_RANGE: (f64, f64) = (0.0, 100.0);

    /// Tick cadence as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Override the tick cadence.
    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    /// Reject configurations that would panic, stall or produce non-finite values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tick_interval_ms == 0 {
            return Err(ValidationError::constraint("tickIntervalMs must be positive"));
        }
        if self.history_capacity == 0 {
            return Err(ValidationError::constraint(
                "historyCapacity must be positive",
            ));
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ValidationError::out_of_range(
                "historyCapacity",
                self.history_capacity,
                1,
                MAX_HISTORY_CAPACITY,
            ));
        }
        self.engine_temp.validate("engineTemp")?;
        self.oil_pressure.validate("oilPressure")?;
        self.tire_pressure.validate("tirePressure")?;

        let finite = [
            ("rpm.bias", self.rpm.bias),
            ("rpm.magnitude", self.rpm.magnitude),
            ("rpm.floor", self.rpm.floor),
            ("fuelBurnPerTick", self.fuel_burn_per_tick),
            ("batteryVoltage.min", self.battery_voltage.min),
            ("batteryVoltage.span", self.battery_voltage.span),
            ("initial.rpm", self.initial.rpm),
            ("initial.engineTemp", self.initial.engine_temp),
            ("initial.oilPressure", self.initial.oil_pressure),
            ("initial.fuelLevel", self.initial.fuel_level),
            ("initial.batteryVoltage", self.initial.battery_voltage),
            ("initial.tirePressure", self.initial.tire_pressure),
            ("initial.historyBaseRpm", self.initial.history_base_rpm),
            ("initial.historyJitterRpm", self.initial.history_jitter_rpm),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::not_finite(*field));
        }

        if self.fuel_burn_per_tick < 0.0 {
            return Err(ValidationError::constraint(
                "fuelBurnPerTick must not be negative",
            ));
        }
        if self.battery_voltage.span < 0.0 {
            return Err(ValidationError::constraint(
                "batteryVoltage.span must not be negative",
            ));
        }
        let (fuel_min, fuel_max) = Self::FUEL_RANGE;
        if !(fuel_min..=fuel_max).contains(&self.initial.fuel_level) {
            return Err(ValidationError::out_of_range(
                "initial.fuelLevel",
                self.initial.fuel_level,
                fuel_min,
                fuel_max,
            ));
        }
        Ok(())
    }
}
