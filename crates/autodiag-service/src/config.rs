//! Service configuration loaded from an optional JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use autodiag_errors::DiagnosticsError;
use autodiag_prediction::PredictionConfig;
use autodiag_telemetry::SimulationConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete daemon configuration.
///
/// Every section falls back to its defaults, so `{}` is a valid file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Telemetry simulation
    pub simulation: SimulationConfig,
    /// Prediction capability
    pub prediction: PredictionConfig,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl ServiceConfig {
    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid config.
    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ServiceConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// See [`ServiceConfig::load_from_path`].
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Write the config as pretty JSON.
    ///
    /// # Errors
    ///
    /// Fails if the config cannot be serialized or the file cannot be written.
    pub async fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        tokio::fs::write(path, content)
            .await
            .context("Failed to write config file")?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, tick_interval_ms: Option<u64>) -> Self {
        if let Some(ms) = tick_interval_ms {
            self.simulation.tick_interval_ms = ms;
        }
        self
    }

    /// Validate both sections.
    ///
    /// # Errors
    ///
    /// The first invalid value, with the section it came from.
    pub fn validate(&self) -> Result<(), DiagnosticsError> {
        // anyhow::Context is also in scope, so name the trait explicitly
        autodiag_errors::ResultExt::with_context(self.simulation.validate(), "simulation config")?;
        autodiag_errors::ResultExt::with_context(self.prediction.validate(), "prediction config")?;
        Ok(())
    }
}
