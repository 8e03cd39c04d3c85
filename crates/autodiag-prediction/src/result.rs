//! Strongly typed prediction result.

use std::fmt;
use std::str::FromStr;

use autodiag_errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Urgency of a predicted fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Monitor
    Low,
    /// Schedule service
    Medium,
    /// Service soon
    High,
    /// Stop driving
    Critical,
}

impl Severity {
    /// Every severity, least urgent first.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    /// Exact, case-sensitive match against the four wire values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .iter()
            .copied()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_enum(
                    "severity",
                    s,
                    Severity::ALL
                        .iter()
                        .map(|sev| sev.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            })
    }
}

/// Diagnostic trouble code: one ASCII uppercase letter followed by exactly
/// four ASCII digits, e.g. `P0524`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FaultCode(String);

impl FaultCode {
    /// Parse and validate a code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFormat`] on field `faultCode` when the
    /// input is not a letter followed by four digits.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let mut chars = code.chars();
        let letter_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
        let digits: Vec<char> = chars.collect();
        if letter_ok && digits.len() == 4 && digits.iter().all(char::is_ascii_digit) {
            Ok(Self(code.to_string()))
        } else {
            Err(ValidationError::invalid_format(
                "faultCode",
                format!("expected an uppercase letter followed by four digits, got {code:?}"),
            ))
        }
    }

    /// The code as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// System letter (`P` powertrain, `C` chassis, `B` body, `U` network).
    pub fn system(&self) -> char {
        self.0.chars().next().unwrap_or('?')
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FaultCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FaultCode> for String {
    fn from(code: FaultCode) -> Self {
        code.0
    }
}

/// A validated diagnosis.
///
/// Built only by [`decode_prediction`](crate::decode_prediction), so every
/// field has passed its domain check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Short name of the fault
    pub predicted_fault: String,
    /// System or component affected
    pub affected_component: String,
    /// Urgency
    pub severity: Severity,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Actionable advice
    pub recommendation: String,
    /// Trouble code
    pub fault_code: FaultCode,
}

impl PredictionResult {
    /// Confidence as a whole percentage for display.
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 100.0).round()
    }
}
