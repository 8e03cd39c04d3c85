//! Command flow through the assembled service.

use std::sync::Arc;
use std::time::Duration;

use autodiag_errors::PredictionErrorKind;
use autodiag_prediction::{
    PredictionConfig, PredictionError, PredictionOrchestrator, PredictionResult, PredictionStatus,
};
use autodiag_service::render;
use autodiag_service::{Command, CommandOutcome, DiagnosticsService};
use autodiag_telemetry::{FixedRandom, SimulationConfig, TelemetrySimulator};
use autodiag_test_helpers::prelude::*;
use tokio::task::JoinHandle;

type Service = DiagnosticsService<Arc<MockCapability>, FixedRandom>;

fn service(capability: &Arc<MockCapability>, credential: Option<&str>) -> Service {
    let simulator = must_with(
        TelemetrySimulator::with_random(SimulationConfig::default(), FixedRandom::new(0.5)),
        "default simulation config",
    );
    let orchestrator = PredictionOrchestrator::new(
        Arc::clone(capability),
        PredictionConfig::default(),
        credential.map(str::to_string),
    );
    DiagnosticsService::new(simulator, orchestrator)
}

type Prediction = JoinHandle<Result<PredictionResult, PredictionError>>;

fn started(outcome: CommandOutcome) -> Result<Prediction, Box<dyn std::error::Error>> {
    match outcome {
        CommandOutcome::PredictionStarted(handle) => Ok(handle),
        other => Err(format!("expected a started prediction, got {other:?}").into()),
    }
}

#[tokio::test]
async fn second_request_is_refused_while_running() -> TestResult {
    let (mock, gate) = MockCapability::returning(valid_prediction_json()).gated();
    let capability = Arc::new(mock);
    let svc = service(&capability, Some("key"));
    let mut status = svc.subscribe_status();

    let first = started(svc.handle(Command::RunPrediction))?;
    status.wait_for(PredictionStatus::is_running).await?;

    assert!(matches!(
        svc.handle(Command::RunPrediction),
        CommandOutcome::PredictionRefused
    ));
    assert_eq!(svc.run_prediction().await, Err(PredictionError::AlreadyRunning));
    assert_eq!(capability.calls(), 1);
    assert!(svc.status().is_running());

    gate.notify_one();
    let result = first.await??;
    assert_eq!(result.fault_code.as_str(), "P0524");
    assert_eq!(svc.status().result(), Some(&result));

    gate.notify_one();
    let again = started(svc.handle(Command::RunPrediction))?;
    again.await??;
    assert_eq!(capability.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn missing_credential_fails_without_calling() -> TestResult {
    let capability = Arc::new(MockCapability::returning(valid_prediction_json()));
    let svc = service(&capability, None);

    match svc.handle(Command::RunPrediction) {
        CommandOutcome::PredictionFailed(err) => {
            assert_eq!(err.kind(), PredictionErrorKind::Configuration);
        }
        other => return Err(format!("expected a failed prediction, got {other:?}").into()),
    }
    assert_eq!(capability.calls(), 0);
    assert!(!svc.status().is_running());

    let json = render::status_json(&svc.status());
    assert_eq!(json["status"], "failed");
    assert_eq!(json["error"]["kind"], "configuration");
    assert_contains!(
        json["error"]["message"].as_str().unwrap_or_default(),
        "API_KEY"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn back_to_back_requests_claim_one_flight() -> TestResult {
    let (mock, gate) = MockCapability::returning(valid_prediction_json()).gated();
    let capability = Arc::new(mock);
    let svc = service(&capability, Some("key"));

    // no yield between the two commands, so the spawned task may not have run yet
    let first = started(svc.handle(Command::RunPrediction))?;
    assert!(svc.status().is_running());
    assert!(matches!(
        svc.handle(Command::RunPrediction),
        CommandOutcome::PredictionRefused
    ));
    assert!(capability.calls() <= 1);

    gate.notify_one();
    first.await??;
    assert_eq!(capability.calls(), 1);
    assert!(svc.status().is_finished());
    Ok(())
}

#[tokio::test]
async fn transport_failure_is_reported_in_status() -> TestResult {
    let capability = Arc::new(MockCapability::failing(PredictionError::transport(
        "503 Service Unavailable: model overloaded",
    )));
    let svc = service(&capability, Some("key"));

    let err = must_err(started(svc.handle(Command::RunPrediction))?.await?);
    assert_eq!(err.kind(), PredictionErrorKind::Transport);
    assert_eq!(svc.status().error(), Some(&err));

    let requests = capability.requests();
    assert_eq!(requests.len(), 1);
    assert_contains!(
        &must_some(requests.first(), "one request").prompt,
        "Current Sensor Data:"
    );

    let json = render::status_json(&svc.status());
    assert_eq!(json["status"], "failed");
    assert_eq!(json["error"]["kind"], "transport");
    assert_contains!(
        json["error"]["message"].as_str().unwrap_or_default(),
        "model overloaded"
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn ticks_continue_while_prediction_runs() -> TestResult {
    let (mock, gate) = MockCapability::returning(valid_prediction_json()).gated();
    let capability = Arc::new(mock);
    let svc = service(&capability, Some("key"));
    let ticker = svc.spawn_ticker();

    let handle = started(svc.handle(Command::RunPrediction))?;
    tokio::time::sleep(Duration::from_millis(4500)).await;
    assert_eq!(svc.tick_count(), 2);
    assert!(svc.status().is_running());

    gate.notify_one();
    handle.await??;
    svc.shutdown();
    assert_eq!(ticker.await?, 2);
    Ok(())
}

#[tokio::test]
async fn fault_reaches_the_prompt_and_the_gauges() -> TestResult {
    let capability = Arc::new(MockCapability::returning(prediction_json_with("Critical", 0.97)));
    let svc = service(&capability, Some("key"));

    assert!(matches!(
        svc.handle(Command::InjectFault),
        CommandOutcome::FaultInjected
    ));
    let text = render::snapshot_text(&svc.snapshot());
    assert_contains!(text, "[ALARM]");

    let result = started(svc.handle(Command::RunPrediction))?.await??;
    assert_eq!(result.severity.as_str(), "Critical");

    let prompt = must_some(capability.last_request(), "request recorded").prompt;
    assert_contains!(&prompt, "- Engine Temperature: 115.0°C");
    assert_contains!(&prompt, "- Oil Pressure: 25.0 PSI");
    assert_contains!(&prompt, "- Battery Voltage: 11.90V");
    assert_eq!(capability.keys(), vec!["key".to_string()]);
    Ok(())
}
