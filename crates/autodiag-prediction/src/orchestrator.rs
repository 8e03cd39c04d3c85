//! Single-flight prediction state machine.
//!
//! ```text
//! Idle ──predict──▶ Running ──▶ Succeeded(result)
//!                      │
//!                      └──────▶ Failed(error)
//! Succeeded / Failed ──predict──▶ Running
//! ```
//!
//! Entry to `Running` is a single atomic check-and-set on the status channel,
//! so two concurrent callers can never both reach the capability. A missing
//! credential fails the call straight to `Failed` without passing through
//! `Running`.

use std::fmt;

use autodiag_errors::PredictionError;
use autodiag_telemetry::VehicleState;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::capability::InferenceCapability;
use crate::config::PredictionConfig;
use crate::credential::ApiKey;
use crate::request::InferenceRequest;
use crate::result::PredictionResult;
use crate::schema::decode_prediction;

/// Observable orchestrator status.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PredictionStatus {
    /// No prediction requested yet
    #[default]
    Idle,
    /// A call is in flight
    Running,
    /// Last call produced a validated result
    Succeeded(PredictionResult),
    /// Last call failed
    Failed(PredictionError),
}

impl PredictionStatus {
    /// True while a call is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self, PredictionStatus::Running)
    }

    /// True once a call has finished either way.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded(_) | PredictionStatus::Failed(_)
        )
    }

    /// Result of the last successful call.
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            PredictionStatus::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Error of the last failed call.
    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            PredictionStatus::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionStatus::Idle => write!(f, "idle"),
            PredictionStatus::Running => write!(f, "running"),
            PredictionStatus::Succeeded(_) => write!(f, "succeeded"),
            PredictionStatus::Failed(_) => write!(f, "failed"),
        }
    }
}

/// Proof that [`PredictionOrchestrator::begin`] moved the status to `Running`.
#[must_use = "a permit that is never completed leaves the prediction running"]
#[derive(Debug)]
pub struct PredictionPermit {
    key: ApiKey,
}

/// Turns sensor snapshots into validated predictions, one call at a time.
pub struct PredictionOrchestrator<C> {
    capability: C,
    config: PredictionConfig,
    credential: Option<String>,
    status: watch::Sender<PredictionStatus>,
}

impl<C> fmt::Debug for PredictionOrchestrator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionOrchestrator")
            .field("config", &self.config)
            .field("credential_set", &self.credential.is_some())
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

impl<C: InferenceCapability> PredictionOrchestrator<C> {
    /// Orchestrator over `capability`.
    ///
    /// `credential` is the raw configured value, usually
    /// [`ApiKey::from_env`]; it is checked on every call, not here.
    pub fn new(capability: C, config: PredictionConfig, credential: Option<String>) -> Self {
        let (status, _) = watch::channel(PredictionStatus::Idle);
        Self {
            capability,
            config,
            credential,
            status,
        }
    }

    /// Current status.
    pub fn status(&self) -> PredictionStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<PredictionStatus> {
        self.status.subscribe()
    }

    /// True while a call is in flight.
    pub fn is_running(&self) -> bool {
        self.status.borrow().is_running()
    }

    /// Active configuration.
    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Request a diagnosis for `snapshot`.
    ///
    /// Invokes the capability at most once. The snapshot is only read.
    ///
    /// # Errors
    ///
    /// - [`PredictionError::AlreadyRunning`] if another call is in flight; the
    ///   status is left untouched.
    /// - [`PredictionError::Configuration`] if the credential is unusable.
    /// - [`PredictionError::Transport`] or [`PredictionError::SchemaValidation`]
    ///   from the call itself.
    pub async fn predict(&self, snapshot: &VehicleState) -> Result<PredictionResult, PredictionError> {
        let permit = self.begin()?;
        self.complete(permit, snapshot).await
    }

    /// First half of [`predict`](Self::predict): enter `Running` without awaiting.
    ///
    /// Lets a caller claim the single flight synchronously and run the call
    /// elsewhere. A permit that is dropped instead of completed leaves the
    /// status `Running`.
    ///
    /// # Errors
    ///
    /// [`PredictionError::AlreadyRunning`] or [`PredictionError::Configuration`],
    /// as for [`predict`](Self::predict).
    pub fn begin(&self) -> Result<PredictionPermit, PredictionError> {
        self.enter().map(|key| PredictionPermit { key })
    }

    /// Second half of [`predict`](Self::predict): make the call claimed by
    /// `permit` and publish its outcome.
    ///
    /// # Errors
    ///
    /// [`PredictionError::Transport`] or [`PredictionError::SchemaValidation`].
    pub async fn complete(
        &self,
        permit: PredictionPermit,
        snapshot: &VehicleState,
    ) -> Result<PredictionResult, PredictionError> {
        let request = InferenceRequest::for_snapshot(snapshot, &self.config);
        info!(model = %request.model, "Prediction started");

        let outcome = match self.capability.generate(&permit.key, &request).await {
            Ok(text) => decode_prediction(&text),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(result) => {
                info!(
                    fault_code = %result.fault_code,
                    severity = %result.severity,
                    confidence = result.confidence,
                    "Prediction succeeded"
                );
                self.status.send_replace(PredictionStatus::Succeeded(result.clone()));
            }
            Err(error) => {
                warn!(kind = %error.kind(), error = %error, "Prediction failed");
                self.status.send_replace(PredictionStatus::Failed(error.clone()));
            }
        }
        outcome
    }

    /// Atomically move to `Running`, or to `Failed` on a bad credential.
    fn enter(&self) -> Result<ApiKey, PredictionError> {
        let mut entry = Err(PredictionError::AlreadyRunning);
        self.status.send_if_modified(|status| {
            if status.is_running() {
                return false;
            }
            match ApiKey::resolve(self.credential.as_deref()) {
                Ok(key) => {
                    *status = PredictionStatus::Running;
                    entry = Ok(key);
                }
                Err(error) => {
                    *status = PredictionStatus::Failed(error.clone());
                    entry = Err(error);
                }
            }
            true
        });

        if let Err(error) = &entry {
            warn!(kind = %error.kind(), "Prediction refused");
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use autodiag_errors::PredictionErrorKind;
    use autodiag_telemetry::{FixedRandom, SimulationConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VALID: &str = r#"{"predictedFault":"Overheating","affectedComponent":"Cooling System",
        "severity":"High","confidence":0.8,"recommendation":"Check coolant.","faultCode":"P0217"}"#;

    struct Canned {
        body: Result<String, PredictionError>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(body: Result<&str, PredictionError>) -> Self {
            Self {
                body: body.map(str::to_string),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InferenceCapability for Canned {
        async fn generate(
            &self,
            _key: &ApiKey,
            _request: &InferenceRequest,
        ) -> Result<String, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body.clone()
        }
    }

    fn snapshot() -> VehicleState {
        VehicleState::initial(&SimulationConfig::default(), &mut FixedRandom::new(0.5))
    }

    fn orchestrator(body: Result<&str, PredictionError>, key: Option<&str>) -> PredictionOrchestrator<Canned> {
        PredictionOrchestrator::new(
            Canned::new(body),
            PredictionConfig::default(),
            key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_success_path() -> Result<(), PredictionError> {
        let orch = orchestrator(Ok(VALID), Some("key"));
        assert_eq!(orch.status(), PredictionStatus::Idle);

        let result = orch.predict(&snapshot()).await?;
        assert_eq!(result.fault_code.as_str(), "P0217");
        assert_eq!(orch.status().result(), Some(&result));
        assert_eq!(orch.capability.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_key_never_calls() {
        for key in [None, Some(""), Some("MISSING_API_KEY")] {
            let orch = orchestrator(Ok(VALID), key);
            let kind = orch.predict(&snapshot()).await.err().map(|e| e.kind());
            assert_eq!(kind, Some(PredictionErrorKind::Configuration));
            assert_eq!(orch.capability.calls.load(Ordering::SeqCst), 0);
            assert_eq!(
                orch.status().error().map(PredictionError::kind),
                Some(PredictionErrorKind::Configuration)
            );
        }
    }

    #[tokio::test]
    async fn test_transport_error_recorded() {
        let orch = orchestrator(Err(PredictionError::transport("503")), Some("key"));
        let err = orch.predict(&snapshot()).await.err();
        assert_eq!(err.as_ref().map(PredictionError::kind), Some(PredictionErrorKind::Transport));
        assert_eq!(orch.status().error(), err.as_ref());
    }

    #[tokio::test]
    async fn test_running_refuses_without_touching_status() {
        let orch = orchestrator(Ok(VALID), Some("key"));
        orch.status.send_replace(PredictionStatus::Running);

        let err = orch.predict(&snapshot()).await.err();
        assert_eq!(err, Some(PredictionError::AlreadyRunning));
        assert!(orch.is_running());
        assert_eq!(orch.capability.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_then_succeeds_again() -> Result<(), PredictionError> {
        let orch = orchestrator(Ok(VALID), Some("key"));
        orch.status
            .send_replace(PredictionStatus::Failed(PredictionError::transport("earlier")));
        orch.predict(&snapshot()).await?;
        assert!(orch.status().is_finished());
        assert!(orch.status().result().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_begin_claims_the_single_flight() -> Result<(), PredictionError> {
        let orch = orchestrator(Ok(VALID), Some("key"));
        let permit = orch.begin()?;
        assert!(orch.is_running());
        assert_eq!(orch.begin().err(), Some(PredictionError::AlreadyRunning));
        assert_eq!(orch.capability.calls.load(Ordering::SeqCst), 0);

        orch.complete(permit, &snapshot()).await?;
        assert!(orch.status().result().is_some());
        assert_eq!(orch.capability.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn test_debug_hides_credential() {
        let orch = orchestrator(Ok(VALID), Some("super-secret"));
        assert!(!format!("{orch:?}").contains("super-secret"));
    }
}
