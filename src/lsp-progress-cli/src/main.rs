//! lsp-progress - status line for language server progress.
//!
//! Reads newline-delimited input records from stdin and prints the status
//! line to stdout whenever it changes, at most once per configured interval.

mod input;
mod status;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use lsp_progress::{
    ProgressBus, ProgressTracker, RateLimiter, StatusConfig, TraceSink, UpdateCallback,
};

use crate::input::InputRecord;
use crate::status::StatusLine;

/// Language server progress status line
#[derive(Parser)]
#[command(name = "lsp-progress")]
#[command(about = "Render language server progress from a stream of JSON-RPC notifications")]
#[command(version)]
struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum time between two redraws, overrides the config file
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Prefix each glyph with the server name
    #[arg(long)]
    show_names: bool,

    /// Append diagnostic counts from textDocument/publishDiagnostics
    #[arg(long)]
    diagnostics: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // stdout carries the status line.
    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<StatusConfig> {
    let mut config = match &args.config {
        Some(path) => StatusConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StatusConfig::default(),
    };

    if let Some(interval_ms) = args.interval_ms {
        config = config.with_interval(Duration::from_millis(interval_ms));
    }
    if args.show_names {
        config.theme.show_name = true;
    }

    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let interval = config.interval();
    info!(interval_ms = config.interval_ms, "Starting lsp-progress");

    let bus = ProgressBus::new();
    let _trace = bus.subscribe(Arc::new(TraceSink));
    let (tracker, _subscription) = ProgressTracker::attach(&bus, &config);

    let status = Arc::new(StatusLine::new(tracker.reader(), config, args.diagnostics));
    let redraw: UpdateCallback = {
        let status = Arc::clone(&status);
        Arc::new(move || status.print())
    };
    tracker.configure(Some(Arc::clone(&redraw)), interval);

    // Diagnostics do not go through the tracker; they get their own limiter.
    let diagnostics_redraw = RateLimiter::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        if line.trim().is_empty() {
            continue;
        }

        let record = match InputRecord::parse(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping malformed input line");
                continue;
            }
        };

        status.register_client(record.client_info());

        match status.apply_diagnostics(&record.client, &record.message) {
            Ok(true) => diagnostics_redraw.notify(Arc::clone(&redraw), interval),
            Ok(false) => {}
            Err(e) => warn!(client = %record.client, error = %e, "Invalid diagnostics notification"),
        }

        match bus.publish_notification(record.client.clone(), &record.message) {
            Ok(published) => {
                if !published {
                    debug!(client = %record.client, "Ignoring non-progress message");
                }
            }
            Err(e) => warn!(client = %record.client, error = %e, "Invalid progress notification"),
        }
    }

    // Input is done; draw what would otherwise still be pending.
    let progress_pending = tracker.cancel_pending_update();
    let diagnostics_pending = diagnostics_redraw.cancel_pending();
    if progress_pending || diagnostics_pending {
        status.print();
    }

    info!("Input closed, exiting");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
