//! Channel metadata and dashboard gauge classification.
//!
//! A gauge shows a reading against a fixed display maximum and changes level
//! once the reading passes 85 % (elevated) and 95 % (alarm) of that maximum.

use serde::Serialize;

use crate::state::VehicleState;

/// Percentage of the gauge maximum above which a reading is elevated.
pub const ELEVATED_PERCENT: f64 = 85.0;

/// Percentage of the gauge maximum above which a reading is in alarm.
pub const ALARM_PERCENT: f64 = 95.0;

/// One scalar sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// Engine temperature
    EngineTemp,
    /// Oil pressure
    OilPressure,
    /// Battery voltage
    BatteryVoltage,
    /// Tire pressure
    TirePressure,
    /// Fuel level
    FuelLevel,
    /// Engine speed
    Rpm,
}

impl Channel {
    /// Every channel, in dashboard order.
    pub const ALL: [Channel; 6] = [
        Channel::EngineTemp,
        Channel::OilPressure,
        Channel::BatteryVoltage,
        Channel::TirePressure,
        Channel::FuelLevel,
        Channel::Rpm,
    ];

    /// Human-readable name.
    pub fn title(self) -> &'static str {
        match self {
            Channel::EngineTemp => "Engine Temperature",
            Channel::OilPressure => "Oil Pressure",
            Channel::BatteryVoltage => "Battery Voltage",
            Channel::TirePressure => "Tire Pressure",
            Channel::FuelLevel => "Fuel Level",
            Channel::Rpm => "Engine RPM",
        }
    }

    /// Display unit.
    pub fn unit(self) -> &'static str {
        match self {
            Channel::EngineTemp => "°C",
            Channel::OilPressure | Channel::TirePressure => "PSI",
            Channel::BatteryVoltage => "V",
            Channel::FuelLevel => "%",
            Channel::Rpm => "RPM",
        }
    }

    /// Decimal places used whenever the reading is shown or sent.
    pub fn precision(self) -> usize {
        match self {
            Channel::Rpm => 0,
            Channel::BatteryVoltage => 2,
            Channel::EngineTemp
            | Channel::OilPressure
            | Channel::TirePressure
            | Channel::FuelLevel => 1,
        }
    }

    /// Full-scale value of the dashboard gauge.
    pub fn gauge_max(self) -> f64 {
        match self {
            Channel::EngineTemp => 120.0,
            Channel::OilPressure | Channel::FuelLevel => 100.0,
            Channel::BatteryVoltage => 16.0,
            Channel::TirePressure => 50.0,
            Channel::Rpm => 8000.0,
        }
    }

    /// Format `value` at this channel's precision, without unit.
    ///
    /// Exact ties round away from zero, so `90.25` shows as `90.3`.
    pub fn format(self, value: f64) -> String {
        let precision = self.precision();
        let scale = 10_f64.powi(i32::try_from(precision).unwrap_or(0));
        let rounded = (value * scale).round() / scale;
        format!("{rounded:.precision$}")
    }
}

/// Gauge colour band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GaugeLevel {
    /// At most 85 % of full scale
    Nominal,
    /// Above 85 % of full scale
    Elevated,
    /// Above 95 % of full scale
    Alarm,
}

impl GaugeLevel {
    /// Classify `value` against a gauge whose full scale is `max`.
    pub fn classify(value: f64, max: f64) -> Self {
        if max <= 0.0 {
            return GaugeLevel::Nominal;
        }
        let percent = value / max * 100.0;
        if percent > ALARM_PERCENT {
            GaugeLevel::Alarm
        } else if percent > ELEVATED_PERCENT {
            GaugeLevel::Elevated
        } else {
            GaugeLevel::Nominal
        }
    }
}

/// A channel reading prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeReading {
    /// Which channel
    pub channel: Channel,
    /// Raw value
    pub value: f64,
    /// Value at the channel's precision
    pub formatted: String,
    /// Display unit
    pub unit: &'static str,
    /// Colour band
    pub level: GaugeLevel,
}

impl GaugeReading {
    /// Read `channel` from `state`.
    pub fn from_state(state: &VehicleState, channel: Channel) -> Self {
        let value = state.reading(channel);
        Self {
            channel,
            value,
            formatted: channel.format(value),
            unit: channel.unit(),
            level: GaugeLevel::classify(value, channel.gauge_max()),
        }
    }
}

/// All six gauges for `state`, in dashboard order.
pub fn gauge_readings(state: &VehicleState) -> Vec<GaugeReading> {
    Channel::ALL
        .iter()
        .map(|&channel| GaugeReading::from_state(state, channel))
        .collect()
}
