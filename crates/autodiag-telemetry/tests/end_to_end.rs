//! Scenario tests through the public simulator API.

use autodiag_telemetry::{
    FixedRandom, GaugeLevel, SampleLabel, SimulationConfig, TelemetrySimulator, gauge_readings,
};
use autodiag_test_helpers::prelude::*;

#[test]
fn neutral_tick_from_initial_state() -> TestResult {
    let mut sim =
        TelemetrySimulator::with_random(SimulationConfig::default(), FixedRandom::new(0.5))?;
    let state = sim.tick().clone();

    assert_approx_eq!(state.oil_pressure, 40.0, 1e-9);
    assert_approx_eq!(state.fuel_level, 74.9, 1e-9);
    assert_approx_eq!(state.battery_voltage, 12.6, 1e-9);
    assert_approx_eq!(state.tire_pressure, 32.0, 1e-9);
    assert_approx_eq!(state.rpm, 800.0, 1e-9);
    assert_approx_eq!(state.engine_temp, 90.25, 1e-9);
    Ok(())
}

#[test]
fn initial_history_is_seeded_from_draws() -> TestResult {
    let sim = TelemetrySimulator::with_random(SimulationConfig::default(), FixedRandom::new(0.5))?;
    let history = &sim.state().rpm_history;

    assert_eq!(history.len(), 20);
    for sample in history.iter() {
        assert_approx_eq!(sample.rpm, 850.0, 1e-9);
    }
    let labels: Vec<String> = history.labels().iter().map(ToString::to_string).collect();
    assert_eq!(labels.first().map(String::as_str), Some("T-20"));
    assert_eq!(labels.last().map(String::as_str), Some("T-1"));
    Ok(())
}

#[test]
fn twenty_ticks_replace_whole_history() -> TestResult {
    let mut sim = TelemetrySimulator::seeded(SimulationConfig::default(), 42)?;
    for _ in 0..20 {
        sim.tick();
    }
    assert!(
        sim.state()
            .rpm_history
            .iter()
            .all(|s| s.label == SampleLabel::Current)
    );
    assert_eq!(sim.tick_count(), 20);
    Ok(())
}

#[test]
fn long_seeded_run_stays_within_walk_bounds() -> TestResult {
    let config = SimulationConfig::default();
    let mut sim = TelemetrySimulator::seeded(config.clone(), 11)?;
    for n in 1..=500 {
        let state = sim.tick();
        let (min, max) = (config.engine_temp.min, config.engine_temp.max);
        assert_in_range!(state.engine_temp, min..=max, "engine temp after tick {n}");
        let (min, max) = (config.oil_pressure.min, config.oil_pressure.max);
        assert_in_range!(state.oil_pressure, min..=max, "oil pressure after tick {n}");
        let (min, max) = (config.tire_pressure.min, config.tire_pressure.max);
        assert_in_range!(state.tire_pressure, min..=max, "tire pressure after tick {n}");
        assert_in_range!(state.fuel_level, 0.0..=100.0, "fuel after tick {n}");
    }
    Ok(())
}

#[test]
fn fault_lights_up_the_temperature_gauge() -> TestResult {
    let mut sim = TelemetrySimulator::seeded(SimulationConfig::default(), 3)?;
    sim.tick();
    sim.inject_fault();

    let readings = gauge_readings(&sim.snapshot());
    let temp = must_some(readings.first(), "engine temperature gauge");
    assert_eq!(temp.formatted, "115.0");
    assert_eq!(temp.level, GaugeLevel::Alarm);
    Ok(())
}

#[test]
fn fuel_burns_down_to_zero_and_stays() -> TestResult {
    let config = SimulationConfig {
        fuel_burn_per_tick: 30.0,
        ..SimulationConfig::default()
    };
    let mut sim = TelemetrySimulator::seeded(config, 1)?;
    let levels: Vec<f64> = (0..4).map(|_| sim.tick().fuel_level).collect();

    assert_approx_eq!(levels.first().copied().unwrap_or(f64::NAN), 45.0, 1e-9);
    assert_approx_eq!(levels.get(1).copied().unwrap_or(f64::NAN), 15.0, 1e-9);
    assert_approx_eq!(levels.get(2).copied().unwrap_or(f64::NAN), 0.0, 1e-12);
    assert_approx_eq!(levels.get(3).copied().unwrap_or(f64::NAN), 0.0, 1e-12);
    Ok(())
}

#[test]
fn config_round_trips_through_json_with_defaults() -> TestResult {
    let config: SimulationConfig = serde_json::from_str(r#"{"tickIntervalMs": 500}"#)?;
    assert_eq!(config.tick_interval_ms, 500);
    assert_eq!(config.history_capacity, 20);
    assert_eq!(config.fault, SimulationConfig::default().fault);
    Ok(())
}
