//! Prediction configuration.

use autodiag_errors::{ValidationError, validate, validate_range};
use serde::{Deserialize, Serialize};

/// Public endpoint of the hosted inference capability.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Low sampling temperature for repeatable, fact-based answers.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Where and how predictions are requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PredictionConfig {
    /// Base URL of the capability
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl PredictionConfig {
    /// Point at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Check the endpoint, model and temperature.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate!(
            self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://"),
            ValidationError::invalid_format("endpoint", "must be an http or https URL")
        );
        validate!(!self.model.trim().is_empty(), ValidationError::empty("model"));
        validate_range!("temperature", self.temperature, 0.0, 2.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() -> Result<(), ValidationError> {
        let config = PredictionConfig::default();
        config.validate()?;
        assert_eq!(config.model, "gemini-2.5-flash");
        Ok(())
    }

    #[test]
    fn test_partial_json_keeps_defaults() -> Result<(), serde_json::Error> {
        let config: PredictionConfig = serde_json::from_str(r#"{"model": "gemini-2.5-pro"}"#)?;
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PredictionConfig::default().with_endpoint("ftp://x").validate().is_err());
        assert!(PredictionConfig::default().with_model(" ").validate().is_err());
        let hot = PredictionConfig {
            temperature: f64::NAN,
            ..PredictionConfig::default()
        };
        assert!(hot.validate().is_err());
    }
}
