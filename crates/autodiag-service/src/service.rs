//! The diagnostics service: one simulator, one orchestrator, a tick driver.

use std::sync::Arc;

use autodiag_errors::PredictionError;
use autodiag_prediction::{
    InferenceCapability, PredictionOrchestrator, PredictionResult, PredictionStatus,
};
use autodiag_telemetry::{RandomSource, TelemetrySimulator, VehicleState};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

/// The two parameterless commands a rendering layer may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Run a prediction on the current snapshot
    RunPrediction,
    /// Force the synthetic fault profile onto the state
    InjectFault,
}

/// Immediate effect of a [`Command`].
#[derive(Debug)]
pub enum CommandOutcome {
    /// Prediction accepted; the handle resolves when the call finishes
    PredictionStarted(JoinHandle<Result<PredictionResult, PredictionError>>),
    /// Prediction refused because one is already running
    PredictionRefused,
    /// Prediction failed before any call was made, e.g. no credential
    PredictionFailed(PredictionError),
    /// Fault profile applied
    FaultInjected,
}

/// Owns the simulator and the orchestrator and drives the tick loop.
///
/// The simulator sits behind a mutex that is only held for a tick, a fault
/// injection or a snapshot clone, never across an await.
pub struct DiagnosticsService<C, R> {
    simulator: Arc<Mutex<TelemetrySimulator<R>>>,
    orchestrator: Arc<PredictionOrchestrator<C>>,
    shutdown: watch::Sender<bool>,
}

impl<C, R> DiagnosticsService<C, R>
where
    C: InferenceCapability + 'static,
    R: RandomSource + Send + 'static,
{
    /// Assemble a service.
    pub fn new(simulator: TelemetrySimulator<R>, orchestrator: PredictionOrchestrator<C>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            simulator: Arc::new(Mutex::new(simulator)),
            orchestrator: Arc::new(orchestrator),
            shutdown,
        }
    }

    /// Consistent copy of the current state.
    pub fn snapshot(&self) -> VehicleState {
        self.simulator.lock().snapshot()
    }

    /// Advance the simulation by one tick outside the timer.
    pub fn tick_once(&self) -> VehicleState {
        self.simulator.lock().tick().clone()
    }

    /// Ticks applied so far.
    pub fn tick_count(&self) -> u64 {
        self.simulator.lock().tick_count()
    }

    /// Force the fault profile onto the current state.
    pub fn inject_fault(&self) {
        self.simulator.lock().inject_fault();
    }

    /// Current prediction status.
    pub fn status(&self) -> PredictionStatus {
        self.orchestrator.status()
    }

    /// Receiver notified on every prediction status change.
    pub fn subscribe_status(&self) -> watch::Receiver<PredictionStatus> {
        self.orchestrator.subscribe()
    }

    /// Predict on the snapshot taken at call start.
    ///
    /// # Errors
    ///
    /// Whatever [`PredictionOrchestrator::predict`] reports.
    pub async fn run_prediction(&self) -> Result<PredictionResult, PredictionError> {
        let snapshot = self.snapshot();
        self.orchestrator.predict(&snapshot).await
    }

    /// Start a prediction on a separate task so ticks continue meanwhile.
    ///
    /// The single flight is claimed before this returns, so a second call
    /// made right after is refused even if the first task has not run yet.
    ///
    /// # Errors
    ///
    /// [`PredictionError::AlreadyRunning`] when a call is in flight, or
    /// [`PredictionError::Configuration`] when the credential is unusable.
    pub fn spawn_prediction(
        &self,
    ) -> Result<JoinHandle<Result<PredictionResult, PredictionError>>, PredictionError> {
        let permit = self.orchestrator.begin()?;
        let snapshot = self.snapshot();
        let orchestrator = Arc::clone(&self.orchestrator);
        Ok(tokio::spawn(async move {
            orchestrator.complete(permit, &snapshot).await
        }))
    }

    /// Execute one rendering-layer command.
    pub fn handle(&self, command: Command) -> CommandOutcome {
        debug!(?command, "Handling command");
        match command {
            Command::RunPrediction => match self.spawn_prediction() {
                Ok(handle) => CommandOutcome::PredictionStarted(handle),
                Err(PredictionError::AlreadyRunning) => CommandOutcome::PredictionRefused,
                Err(error) => CommandOutcome::PredictionFailed(error),
            },
            Command::InjectFault => {
                self.inject_fault();
                CommandOutcome::FaultInjected
            }
        }
    }

    /// Run the tick loop until [`shutdown`](Self::shutdown).
    ///
    /// The first tick fires one interval after start. Late ticks are delayed,
    /// never bursted. The handle resolves to the number of ticks applied.
    pub fn spawn_ticker(&self) -> JoinHandle<u64> {
        let simulator = Arc::clone(&self.simulator);
        let mut shutdown = self.shutdown.subscribe();
        let period = simulator.lock().tick_interval();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            let mut ticks = 0u64;
            info!(period_ms = period.as_millis(), "Tick loop started");
            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        simulator.lock().tick();
                        ticks = ticks.saturating_add(1);
                    }
                }
            }
            info!(ticks, "Tick loop stopped");
            ticks
        })
    }

    /// Stop the tick loop.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}
