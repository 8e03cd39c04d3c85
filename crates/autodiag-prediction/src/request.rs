//! Turning a sensor snapshot into an inference request.

use autodiag_telemetry::{Channel, VehicleState};
use serde::Serialize;
use serde_json::Value;

use crate::config::PredictionConfig;
use crate::schema::response_schema;

/// Static normal operating ranges embedded in every prompt.
pub const REFERENCE_RANGES: [(&str, &str); 6] = [
    ("Engine Temperature", "85-105°C"),
    ("Oil Pressure", "30-60 PSI"),
    ("Engine RPM", "700-4000 RPM (normal driving)"),
    ("Fuel Level", "0-100%"),
    ("Battery Voltage", "12.4-12.8V (engine off), 13.7-14.7V (engine on)"),
    ("Tire Pressure", "30-35 PSI"),
];

/// Order in which readings appear in the prompt.
const PROMPT_ORDER: [Channel; 6] = [
    Channel::EngineTemp,
    Channel::OilPressure,
    Channel::Rpm,
    Channel::FuelLevel,
    Channel::BatteryVoltage,
    Channel::TirePressure,
];

/// One call's worth of input for the capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    /// Model identifier
    pub model: String,
    /// Plain-text prompt
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Response-shape constraint
    pub response_schema: Value,
}

impl InferenceRequest {
    /// Build the request for `snapshot`.
    pub fn for_snapshot(snapshot: &VehicleState, config: &PredictionConfig) -> Self {
        Self {
            model: config.model.clone(),
            prompt: build_prompt(snapshot),
            temperature: config.temperature,
            response_schema: response_schema(),
        }
    }
}

/// A reading with its unit, as written into the prompt.
pub fn format_reading(channel: Channel, value: f64) -> String {
    let formatted = channel.format(value);
    match channel {
        Channel::OilPressure | Channel::TirePressure | Channel::Rpm => {
            format!("{formatted} {}", channel.unit())
        }
        Channel::EngineTemp | Channel::FuelLevel | Channel::BatteryVoltage => {
            format!("{formatted}{}", channel.unit())
        }
    }
}

/// Diagnostic prompt for `snapshot`.
pub fn build_prompt(snapshot: &VehicleState) -> String {
    let mut prompt = String::from(
        "You are an advanced AI diagnostics system for a modern vehicle.\n\
         Based on the following real-time sensor data, predict the most likely potential \
         component failure or required maintenance.\n\
         Provide your analysis in a structured JSON format.\n\n\
         Normal Operating Ranges:\n",
    );
    for (name, range) in REFERENCE_RANGES {
        prompt.push_str(&format!("- {name}: {range}\n"));
    }

    prompt.push_str("\nCurrent Sensor Data:\n");
    for channel in PROMPT_ORDER {
        let reading = format_reading(channel, snapshot.reading(channel));
        prompt.push_str(&format!("- {}: {reading}\n", channel.title()));
    }

    prompt.push_str(
        "\nAnalyze this data and identify the most critical upcoming issue.\n\
         Consider how these values deviate from normal ranges and how they might correlate.\n\
         For example, high engine temp and low oil pressure could indicate an oil leak or pump failure.\n\
         Low battery voltage could indicate an alternator issue.\n\
         Assign a standard automotive diagnostic fault code (e.g., P0300, C1221).\n\
         Provide a clear, actionable recommendation for the driver or mechanic.\n",
    );
    prompt
}
