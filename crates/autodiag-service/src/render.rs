//! Text and JSON rendering of snapshots and prediction status.

use autodiag_errors::PredictionErrorKind;
use autodiag_prediction::{PredictionResult, PredictionStatus};
use autodiag_telemetry::{GaugeLevel, GaugeReading, VehicleState, gauge_readings};
use serde::Serialize;
use serde_json::{Value, json};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON document per line
    Json,
}

fn level_marker(level: GaugeLevel) -> &'static str {
    match level {
        GaugeLevel::Nominal => "",
        GaugeLevel::Elevated => "  [elevated]",
        GaugeLevel::Alarm => "  [ALARM]",
    }
}

fn gauge_line(reading: &GaugeReading) -> String {
    format!(
        "{:<20} {:>8} {:<4}{}",
        reading.channel.title(),
        reading.formatted,
        reading.unit,
        level_marker(reading.level)
    )
}

/// Six gauges plus a one-line summary of the rpm history.
pub fn snapshot_text(state: &VehicleState) -> String {
    let mut lines: Vec<String> = gauge_readings(state).iter().map(gauge_line).collect();

    let rpms: Vec<f64> = state.rpm_history.iter().map(|s| s.rpm).collect();
    let min = rpms.iter().copied().fold(f64::INFINITY, f64::min);
    let max = rpms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if let (Some(oldest), Some(latest)) = (state.rpm_history.oldest(), state.rpm_history.latest()) {
        lines.push(format!(
            "RPM history {}..{}: min {min:.0}, max {max:.0}, latest {:.0}",
            oldest.label, latest.label, latest.rpm
        ));
    }
    lines.join("\n")
}

/// Snapshot with its gauges as JSON.
pub fn snapshot_json(state: &VehicleState) -> Value {
    json!({
        "state": state,
        "gauges": gauge_readings(state),
    })
}

fn result_text(result: &PredictionResult) -> String {
    [
        format!("Predicted fault: {}", result.predicted_fault),
        format!("Component:       {}", result.affected_component),
        format!("Severity:        {}", result.severity),
        format!("Confidence:      {:.0}%", result.confidence_percent()),
        format!("Fault code:      {}", result.fault_code),
        format!("Recommendation:  {}", result.recommendation),
    ]
    .join("\n")
}

/// Prediction status as text.
pub fn status_text(status: &PredictionStatus) -> String {
    match status {
        PredictionStatus::Idle => "Prediction: idle".to_string(),
        PredictionStatus::Running => "Prediction: running...".to_string(),
        PredictionStatus::Succeeded(result) => result_text(result),
        PredictionStatus::Failed(error) => {
            format!("Prediction failed ({}): {error}", error.kind())
        }
    }
}

#[derive(Serialize)]
struct ErrorView {
    kind: String,
    message: String,
}

#[derive(Serialize)]
struct StatusView<'a> {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorView>,
}

/// Prediction status as JSON.
pub fn status_json(status: &PredictionStatus) -> Value {
    let view = StatusView {
        status: status.to_string(),
        result: status.result(),
        error: status.error().map(|e| ErrorView {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }),
    };
    serde_json::to_value(view).unwrap_or(Value::Null)
}

/// Message for a refused prediction request.
pub fn refused_text() -> String {
    format!(
        "Prediction refused ({}): a prediction is already running",
        PredictionErrorKind::AlreadyRunning
    )
}

/// Render a snapshot in `format`.
pub fn snapshot(format: OutputFormat, state: &VehicleState) -> String {
    match format {
        OutputFormat::Text => snapshot_text(state),
        OutputFormat::Json => snapshot_json(state).to_string(),
    }
}

/// Render a status in `format`.
pub fn status(format: OutputFormat, status: &PredictionStatus) -> String {
    match format {
        OutputFormat::Text => status_text(status),
        OutputFormat::Json => status_json(status).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodiag_errors::PredictionError;
    use autodiag_prediction::decode_prediction;
    use autodiag_telemetry::{FixedRandom, SimulationConfig};

    fn state() -> VehicleState {
        VehicleState::initial(&SimulationConfig::default(), &mut FixedRandom::new(0.5))
    }

    #[test]
    fn test_snapshot_text_lists_gauges_and_history() {
        let mut state = state();
        state.apply_fault(&SimulationConfig::default().fault);
        let text = snapshot_text(&state);

        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("Engine Temperature"));
        assert!(text.contains("115.0"));
        assert!(text.contains("[ALARM]"));
        assert!(text.contains("RPM history T-20..T-1: min 850, max 850, latest 850"));
    }

    #[test]
    fn test_snapshot_json_uses_wire_names() {
        let json = snapshot_json(&state());
        assert_eq!(json["state"]["fuelLevel"], 75.0);
        assert_eq!(json["state"]["rpmHistory"][0]["label"], "T-20");
        assert_eq!(json["gauges"][0]["channel"], "engineTemp");
        assert_eq!(json["gauges"][0]["level"], "nominal");
    }

    #[test]
    fn test_status_text_for_result() -> Result<(), PredictionError> {
        let result = decode_prediction(
            r#"{"predictedFault":"Alternator Failure Imminent","affectedComponent":"Charging System",
                "severity":"High","confidence":0.876,"recommendation":"Test the alternator.","faultCode":"P0562"}"#,
        )?;
        let text = status_text(&PredictionStatus::Succeeded(result));
        assert!(text.contains("Severity:        High"));
        assert!(text.contains("Confidence:      88%"));
        assert!(text.contains("Fault code:      P0562"));
        Ok(())
    }

    #[test]
    fn test_status_json_for_failure() {
        let status = PredictionStatus::Failed(PredictionError::transport("503 Service Unavailable"));
        let json = status_json(&status);
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"]["kind"], "transport");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_refused_text_names_kind() {
        assert!(refused_text().contains("already_running"));
    }
}
