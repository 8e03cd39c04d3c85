//! Vehicle sensor state and its rolling rpm history.

use std::collections::VecDeque;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::{FaultProfile, SimulationConfig};
use crate::gauge::Channel;
use crate::random::RandomSource;

/// Label of one history sample.
///
/// Seeded samples carry their ordinal distance from now (`T-20` ... `T-1`);
/// every sample appended by a tick is the current sample (`Now`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleLabel {
    /// Seeded sample, `n` ticks before the simulation started
    Ago(usize),
    /// Sample appended by a tick
    Current,
}

impl fmt::Display for SampleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleLabel::Ago(n) => write!(f, "T-{n}"),
            SampleLabel::Current => write!(f, "Now"),
        }
    }
}

impl Serialize for SampleLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One entry of the rpm history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RpmSample {
    /// Position label
    pub label: SampleLabel,
    /// Engine speed
    pub rpm: f64,
}

impl RpmSample {
    /// A sample appended by a tick.
    pub fn current(rpm: f64) -> Self {
        Self {
            label: SampleLabel::Current,
            rpm,
        }
    }
}

/// Fixed-capacity FIFO of rpm samples.
///
/// Once seeded the window is always full: every push evicts the oldest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RpmHistory {
    samples: VecDeque<RpmSample>,
    capacity: usize,
}

impl RpmHistory {
    /// Fill a window of `capacity` samples labelled `T-capacity` ... `T-1`,
    /// each `base + draw * jitter`.
    pub fn seeded<R: RandomSource + ?Sized>(
        capacity: usize,
        base: f64,
        jitter: f64,
        random: &mut R,
    ) -> Self {
        let samples = (0..capacity)
            .map(|i| RpmSample {
                label: SampleLabel::Ago(capacity - i),
                rpm: base + random.next_unit() * jitter,
            })
            .collect();
        Self { samples, capacity }
    }

    /// Append `sample`, returning the evicted oldest sample when the window was full.
    pub fn push(&mut self, sample: RpmSample) -> Option<RpmSample> {
        if self.capacity == 0 {
            return Some(sample);
        }
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the window holds nothing.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Window size.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RpmSample> {
        self.samples.iter()
    }

    /// Newest sample.
    pub fn latest(&self) -> Option<&RpmSample> {
        self.samples.back()
    }

    /// Oldest sample.
    pub fn oldest(&self) -> Option<&RpmSample> {
        self.samples.front()
    }

    /// Labels, oldest first.
    pub fn labels(&self) -> Vec<SampleLabel> {
        self.samples.iter().map(|s| s.label).collect()
    }
}

impl Serialize for RpmHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.samples)
    }
}

/// Multi-channel vehicle sensor state.
///
/// Owned and mutated only by the simulator; everyone else works on clones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    /// Degrees C, clamped to the engine temperature walk range
    pub engine_temp: f64,
    /// PSI, clamped to the oil pressure walk range
    pub oil_pressure: f64,
    /// Engine speed, floored at idle
    pub rpm: f64,
    /// Percent, never increases under simulation
    pub fuel_level: f64,
    /// V, redrawn every tick
    pub battery_voltage: f64,
    /// PSI, clamped to the tire pressure walk range
    pub tire_pressure: f64,
    /// Rolling rpm window
    pub rpm_history: RpmHistory,
}

impl VehicleState {
    /// Starting state; the history consumes one draw per sample.
    pub fn initial<R: RandomSource + ?Sized>(config: &SimulationConfig, random: &mut R) -> Self {
        let initial = &config.initial;
        Self {
            engine_temp: initial.engine_temp,
            oil_pressure: initial.oil_pressure,
            rpm: initial.rpm,
            fuel_level: initial.fuel_level,
            battery_voltage: initial.battery_voltage,
            tire_pressure: initial.tire_pressure,
            rpm_history: RpmHistory::seeded(
                config.history_capacity,
                initial.history_base_rpm,
                initial.history_jitter_rpm,
                random,
            ),
        }
    }

    /// Overwrite the four fault channels; rpm, fuel and history are untouched.
    pub fn apply_fault(&mut self, fault: &FaultProfile) {
        self.engine_temp = fault.engine_temp;
        self.oil_pressure = fault.oil_pressure;
        self.battery_voltage = fault.battery_voltage;
        self.tire_pressure = fault.tire_pressure;
    }

    /// Current value of one channel.
    pub fn reading(&self, channel: Channel) -> f64 {
        match channel {
            Channel::EngineTemp => self.engine_temp,
            Channel::OilPressure => self.oil_pressure,
            Channel::Rpm => self.rpm,
            Channel::FuelLevel => self.fuel_level,
            Channel::BatteryVoltage => self.battery_voltage,
            Channel::TirePressure => self.tire_pressure,
        }
    }
}
