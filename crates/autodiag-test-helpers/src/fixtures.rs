//! Canned capability payloads.

use serde_json::{Value, json};

/// A payload that passes every schema check.
pub fn valid_prediction() -> Value {
    json!({
        "predictedFault": "Oil Pump Failure",
        "affectedComponent": "Lubrication System",
        "severity": "Critical",
        "confidence": 0.92,
        "recommendation": "Stop the vehicle safely and check the oil level and pump.",
        "faultCode": "P0524"
    })
}

/// [`valid_prediction`] as text.
pub fn valid_prediction_json() -> String {
    valid_prediction().to_string()
}

/// [`valid_prediction`] with `severity` and `confidence` replaced.
pub fn prediction_json_with(severity: &str, confidence: f64) -> String {
    let mut payload = valid_prediction();
    if let Some(fields) = payload.as_object_mut() {
        fields.insert("severity".into(), json!(severity));
        fields.insert("confidence".into(), json!(confidence));
    }
    payload.to_string()
}

/// A `generateContent` response envelope whose only candidate carries `text`.
pub fn generate_content_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() -> Result<(), serde_json::Error> {
        let payload: Value = serde_json::from_str(&prediction_json_with("Extreme", 1.4))?;
        assert_eq!(payload["severity"], "Extreme");
        assert_eq!(payload["faultCode"], "P0524");
        Ok(())
    }

    #[test]
    fn test_envelope_wraps_text() {
        let envelope = generate_content_envelope("{}");
        assert_eq!(envelope["candidates"][0]["content"]["parts"][0]["text"], "{}");
    }
}
