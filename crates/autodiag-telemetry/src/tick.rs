//! The simulation transition.

use crate::config::SimulationConfig;
use crate::random::RandomSource;
use crate::state::{RpmSample, VehicleState};

/// Advance `prev` by one tick.
///
/// Every channel is computed from `prev`, never from another channel's new
/// value. Draws are consumed in a fixed order (rpm, engine temperature, oil
/// pressure, battery voltage, tire pressure) so a seeded source replays a run
/// exactly. Fuel takes no draw.
///
/// # Example
///
/// ```
/// use autodiag_telemetry::{FixedRandom, SimulationConfig, VehicleState, tick};
///
/// let config = SimulationConfig::default();
/// let mut random = FixedRandom::new(0.5);
/// let start = VehicleState::initial(&config, &mut random);
/// let next = tick(&start, &config, &mut random);
///
/// assert!((next.engine_temp - 90.25).abs() < 1e-9);
/// assert!((next.fuel_level - 74.9).abs() < 1e-9);
/// assert_eq!(next.rpm_history.len(), 20);
/// ```
pub fn tick<R: RandomSource + ?Sized>(
    prev: &VehicleState,
    config: &SimulationConfig,
    random: &mut R,
) -> VehicleState {
    let rpm = config.rpm.step(prev.rpm, random.next_unit());
    let mut rpm_history = prev.rpm_history.clone();
    rpm_history.push(RpmSample::current(rpm));

    let engine_temp = config.engine_temp.step(prev.engine_temp, random.next_unit());
    let oil_pressure = config.oil_pressure.step(prev.oil_pressure, random.next_unit());
    let battery_voltage = config.battery_voltage.sample(random.next_unit());
    let tire_pressure = config
        .tire_pressure
        .step(prev.tire_pressure, random.next_unit());

    let (fuel_min, fuel_max) = SimulationConfig::FUEL_RANGE;
    let fuel_level = (prev.fuel_level - config.fuel_burn_per_tick)
        .max(fuel_min)
        .min(fuel_max);

    VehicleState {
        engine_temp,
        oil_pressure,
        rpm,
        fuel_level,
        battery_voltage,
        tire_pressure,
        rpm_history,
    }
}
