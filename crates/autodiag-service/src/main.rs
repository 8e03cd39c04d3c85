//! autodiagd - simulated vehicle telemetry with on-demand fault prediction

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use autodiag_prediction::{API_KEY_ENV, ApiKey, GeminiClient, PredictionOrchestrator};
use autodiag_service::render::{self, OutputFormat};
use autodiag_service::{CommandOutcome, DiagnosticsService, HELP, Input, ServiceConfig};
use autodiag_telemetry::TelemetrySimulator;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "autodiagd")]
#[command(about = "Simulated vehicle telemetry with on-demand AI fault prediction")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long, env = "AUTODIAG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the simulation tick interval
    #[arg(long)]
    tick_interval_ms: Option<u64>,

    /// Seed the simulation for a reproducible signal
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print snapshots and status as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8, configured: Option<&str>) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match configured {
            Some(directive) if verbose == 0 => EnvFilter::new(directive),
            _ => EnvFilter::new(level),
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = ServiceConfig::load(cli.config.as_deref())
        .await?
        .with_overrides(cli.tick_interval_ms);
    init_tracing(cli.verbose, config.log_filter.as_deref());
    config.validate().context("Invalid configuration")?;

    info!("Starting autodiagd v{}", env!("CARGO_PKG_VERSION"));

    let credential = ApiKey::from_env();
    if credential.is_none() {
        warn!("{API_KEY_ENV} is not set; predictions will fail until it is configured");
    }
    let client = GeminiClient::new(config.prediction.endpoint.clone())?;
    let orchestrator = PredictionOrchestrator::new(client, config.prediction.clone(), credential);

    let simulator = match cli.seed {
        Some(seed) => TelemetrySimulator::seeded(config.simulation.clone(), seed)?,
        None => TelemetrySimulator::new(config.simulation.clone())?,
    };

    let service = DiagnosticsService::new(simulator, orchestrator);
    let ticker = service.spawn_ticker();

    let mut status_rx = service.subscribe_status();
    let watcher = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow_and_update().clone();
            println!("{}", render::status(format, &status));
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            line = lines.next_line() => line.context("Failed to read stdin")?,
        };
        let Some(line) = line else {
            break;
        };

        match line.parse::<Input>() {
            Ok(Input::Command(command)) => match service.handle(command) {
                // the status watcher reports the outcome
                CommandOutcome::PredictionStarted(_) | CommandOutcome::PredictionFailed(_) => {}
                CommandOutcome::PredictionRefused => println!("{}", render::refused_text()),
                CommandOutcome::FaultInjected => {
                    println!("{}", render::snapshot(format, &service.snapshot()));
                }
            },
            Ok(Input::Snapshot) => println!("{}", render::snapshot(format, &service.snapshot())),
            Ok(Input::Status) => println!("{}", render::status(format, &service.status())),
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Quit) => break,
            Ok(Input::Empty) => {}
            Err(e) => eprintln!("{e}"),
        }
    }

    service.shutdown();
    match ticker.await {
        Ok(ticks) => info!(ticks, "Service stopped"),
        Err(e) => error!("Tick loop failed: {e}"),
    }
    watcher.abort();
    Ok(())
}
