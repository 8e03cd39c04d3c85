//! Response schema sent to the capability and strict decoding of its answer.
//!
//! The capability is asked to constrain its output to [`response_schema`], but
//! nothing it returns is trusted: [`decode_prediction`] re-checks every field
//! and reports all violations at once rather than stopping at the first.

use autodiag_errors::{PredictionError, SchemaViolations, ValidationError};
use serde_json::{Map, Value, json};

use crate::result::{FaultCode, PredictionResult, Severity};

/// Wire names of the result fields, in schema order.
pub const RESULT_FIELDS: [&str; 6] = [
    "predictedFault",
    "affectedComponent",
    "severity",
    "confidence",
    "recommendation",
    "faultCode",
];

/// Inclusive confidence bounds.
pub const CONFIDENCE_RANGE: (f64, f64) = (0.0, 1.0);

/// Response-shape constraint equivalent to [`PredictionResult`].
pub fn response_schema() -> Value {
    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "predictedFault": {
                "type": "STRING",
                "description": "A concise name for the predicted fault (e.g., 'Alternator Failure Imminent')."
            },
            "affectedComponent": {
                "type": "STRING",
                "description": "The primary vehicle system or component affected (e.g., 'Charging System')."
            },
            "severity": {
                "type": "STRING",
                "enum": severities,
                "description": "The urgency of the issue."
            },
            "confidence": {
                "type": "NUMBER",
                "description": "The model's confidence in this prediction, from 0.0 to 1.0."
            },
            "recommendation": {
                "type": "STRING",
                "description": "A clear, actionable recommendation for the user (e.g., 'Service vehicle immediately. Avoid driving.')."
            },
            "faultCode": {
                "type": "STRING",
                "description": "A plausible automotive Diagnostic Trouble Code (DTC), e.g., P0524."
            }
        },
        "required": RESULT_FIELDS,
    })
}

/// Decode and validate the capability's structured payload.
///
/// Surrounding whitespace is ignored and unknown fields are tolerated. Every
/// field is checked; a result is returned only when none fail.
///
/// # Errors
///
/// [`PredictionError::SchemaValidation`] carrying every violation found, or a
/// single `response` format violation when the text is not a JSON object.
pub fn decode_prediction(text: &str) -> Result<PredictionResult, PredictionError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| PredictionError::malformed(format!("payload is not valid JSON: {e}")))?;
    let Value::Object(fields) = value else {
        return Err(PredictionError::malformed("payload is not a JSON object"));
    };

    let mut violations = SchemaViolations::default();
    let predicted_fault = text_field(&fields, "predictedFault", &mut violations);
    let affected_component = text_field(&fields, "affectedComponent", &mut violations);
    let severity = severity_field(&fields, &mut violations);
    let confidence = confidence_field(&fields, &mut violations);
    let recommendation = text_field(&fields, "recommendation", &mut violations);
    let fault_code = fault_code_field(&fields, &mut violations);

    match (
        predicted_fault,
        affected_component,
        severity,
        confidence,
        recommendation,
        fault_code,
    ) {
        (
            Some(predicted_fault),
            Some(affected_component),
            Some(severity),
            Some(confidence),
            Some(recommendation),
            Some(fault_code),
        ) if violations.is_empty() => Ok(PredictionResult {
            predicted_fault,
            affected_component,
            severity,
            confidence,
            recommendation,
            fault_code,
        }),
        _ => Err(PredictionError::SchemaValidation(violations)),
    }
}

fn string_field<'a>(
    fields: &'a Map<String, Value>,
    name: &str,
    violations: &mut SchemaViolations,
) -> Option<&'a str> {
    match fields.get(name) {
        None | Some(Value::Null) => {
            violations.push(ValidationError::required(name));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            violations.push(ValidationError::invalid_format(
                name,
                format!("expected a string, got {}", kind_of(other)),
            ));
            None
        }
    }
}

fn text_field(
    fields: &Map<String, Value>,
    name: &str,
    violations: &mut SchemaViolations,
) -> Option<String> {
    let raw = string_field(fields, name, violations)?;
    if raw.trim().is_empty() {
        violations.push(ValidationError::empty(name));
        return None;
    }
    Some(raw.to_string())
}

fn severity_field(fields: &Map<String, Value>, violations: &mut SchemaViolations) -> Option<Severity> {
    let raw = string_field(fields, "severity", violations)?;
    match raw.parse::<Severity>() {
        Ok(severity) => Some(severity),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

fn confidence_field(fields: &Map<String, Value>, violations: &mut SchemaViolations) -> Option<f64> {
    let value = match fields.get("confidence") {
        None | Some(Value::Null) => {
            violations.push(ValidationError::required("confidence"));
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            violations.push(ValidationError::invalid_format(
                "confidence",
                format!("expected a number, got {}", kind_of(other)),
            ));
            return None;
        }
    };
    let Some(value) = value.filter(|v| v.is_finite()) else {
        violations.push(ValidationError::not_finite("confidence"));
        return None;
    };
    let (min, max) = CONFIDENCE_RANGE;
    if !(min..=max).contains(&value) {
        violations.push(ValidationError::out_of_range("confidence", value, min, max));
        return None;
    }
    Some(value)
}

fn fault_code_field(
    fields: &Map<String, Value>,
    violations: &mut SchemaViolations,
) -> Option<FaultCode> {
    let raw = string_field(fields, "faultCode", violations)?;
    match FaultCode::parse(raw) {
        Ok(code) => Some(code),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
