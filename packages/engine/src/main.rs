// packages/engine/src/main.rs
//! Victrola Replay Engine
//!
//! Command-line player for captured remote-desktop session logs.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use victrola_engine::observability::{describe_metrics, init_tracing};
use victrola_engine::playback::{
    DriverExit, PlaybackClock, PlaybackDriver, RunMode, SystemTimer,
};
use victrola_engine::recording::load_log;
use victrola_engine::replay::engine::EngineOptions;
use victrola_engine::replay::images::AnyImage;
use victrola_engine::replay::sink::{Command, Diagnostic, PresentationSink};
use victrola_engine::replay::ReplayEngine;
use victrola_engine::utils::config::EngineConfig;

#[derive(Debug, Parser)]
#[command(
    name = "victrola-engine",
    about = "Replay a captured remote-desktop session log",
    version
)]
struct Cli {
    /// Event log (JSON array of events)
    log: PathBuf,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start position in seconds
    #[arg(long)]
    at: Option<f64>,

    /// Play from the start position to the end of the recording
    #[arg(long)]
    play: bool,

    /// Playback speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Print every presentation command as a JSON line
    #[arg(long)]
    trace: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Sink for the command-line player
#[derive(Debug, Default)]
struct CliSink {
    trace: bool,
    executed: u64,
    diagnostics: u64,
}

impl PresentationSink for CliSink {
    fn execute(&mut self, command: Command) {
        self.executed += 1;
        if self.trace {
            match serde_json::to_string(&command) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to encode command: {}", e),
            }
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics += 1;
        warn!("{}", diagnostic);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.json_logs)?;
    describe_metrics();

    info!("Starting Victrola Replay Engine v{}", victrola_engine::VERSION);

    let mut config = EngineConfig::load_from(cli.config.as_deref())?;
    if let Some(speed) = cli.speed {
        config.playback.speed = speed;
    }
    if cli.at.is_some() {
        config.playback.initial_time_secs = cli.at;
    }
    config.validate()?;

    let log = load_log(&cli.log, config.log.filter.clone())
        .await
        .with_context(|| format!("Failed to load {}", cli.log.display()))?;
    info!(
        "Loaded {} of {} events ({} filtered)",
        log.len(),
        log.observed_count(),
        log.filtered_count()
    );

    let sink = CliSink {
        trace: cli.trace,
        ..Default::default()
    };
    let mut engine = ReplayEngine::with_options(
        Arc::new(log),
        sink,
        AnyImage,
        EngineOptions::from(&config),
    );
    engine.reset();
    engine.seek_initial(config.playback.initial_time_secs);

    if cli.play {
        let clock = PlaybackClock::new(SystemTimer::new());
        let mut driver = PlaybackDriver::new(
            clock,
            Duration::from_millis(config.playback.frame_interval_ms),
        );

        // No interactive controls; ctrl-c cancels the driver future mid-playback
        let (tx, rx) = mpsc::channel(1);
        driver.clock_mut().play(&mut engine);

        let exit = tokio::select! {
            exit = driver.run(&mut engine, rx, RunMode::UntilEnd) => exit,
            _ = tokio::signal::ctrl_c() => {
                info!("Received interrupt, stopping playback");
                DriverExit::Stopped
            }
        };
        drop(tx);
        info!("Playback finished: {:?}", exit);
    }

    let ripples = engine.ripples();
    println!("{}", engine.label(config.playback.label_mode));
    println!(
        "applied {} of {} events, {} commands, {} diagnostics",
        engine.applied_count(),
        engine.log().len(),
        engine.sink().executed,
        engine.sink().diagnostics
    );
    if !ripples.is_empty() {
        println!("{} click ripples visible", ripples.len());
    }
    if !engine.keystrokes().is_empty() {
        println!("keystrokes:\n{}", engine.keystrokes());
    }

    Ok(())
}
