//! The single static credential.

use std::fmt;

use autodiag_errors::PredictionError;

/// Environment variable holding the credential.
pub const API_KEY_ENV: &str = "API_KEY";

/// Placeholder that counts as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "MISSING_API_KEY";

/// Message surfaced when the credential is missing.
pub const MISSING_KEY_MESSAGE: &str =
    "API key is not configured. Please set the API_KEY environment variable.";

/// A credential that has passed [`ApiKey::resolve`].
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Accept `raw` unless it is absent, blank or the placeholder.
    ///
    /// # Errors
    ///
    /// [`PredictionError::Configuration`] when the credential is unusable.
    pub fn resolve(raw: Option<&str>) -> Result<Self, PredictionError> {
        match raw.map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => {
                Ok(Self(key.to_string()))
            }
            _ => Err(PredictionError::configuration(MISSING_KEY_MESSAGE)),
        }
    }

    /// Raw value of [`API_KEY_ENV`], if set and valid unicode.
    pub fn from_env() -> Option<String> {
        std::env::var(API_KEY_ENV).ok()
    }

    /// The secret, for the one place that sends it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodiag_errors::PredictionErrorKind;

    #[test]
    fn test_unusable_credentials() {
        for raw in [None, Some(""), Some("   "), Some(PLACEHOLDER_API_KEY)] {
            let kind = ApiKey::resolve(raw).err().map(|e| e.kind());
            assert_eq!(kind, Some(PredictionErrorKind::Configuration), "{raw:?}");
        }
    }

    #[test]
    fn test_message_names_variable() {
        let message = ApiKey::resolve(None).err().map(|e| e.to_string());
        assert_eq!(
            message.as_deref(),
            Some("Configuration error: API key is not configured. Please set the API_KEY environment variable.")
        );
    }

    #[test]
    fn test_debug_is_redacted() -> Result<(), PredictionError> {
        let key = ApiKey::resolve(Some(" sk-test-123 "))?;
        assert_eq!(key.expose(), "sk-test-123");
        assert!(!format!("{key:?}").contains("sk-test"));
        Ok(())
    }
}
