mod config;
mod error;
mod scan;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use gclog::PipelineMetrics;
use tracing::{error, info};

use crate::config::{LogFormat, LogOutput, ScanConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Phase 1: Basic tracing so we can log during config loading
    // Uses set_default (thread-local) so it can be replaced by Phase 2's global subscriber
    let _basic_tracing = init_tracing_basic();

    info!("Starting gcscan v{}", env!("CARGO_PKG_VERSION"));

    let config = ScanConfig::load().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    // Phase 2: Re-initialize tracing with config (format, level)
    drop(_basic_tracing);
    init_tracing_from_config(&config)?;

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: gcscan <gc-log>...");
    }

    let metrics = Arc::new(PipelineMetrics::new());
    let results = scan::scan_files(paths, &config, Arc::clone(&metrics), scan::stdout_sink()).await;

    let mut failed = 0usize;
    for (path, result) in &results {
        match result {
            Ok(report) => info!(
                path = %report.path,
                events = report.events,
                unknown = report.unknown,
                total_pause_ms = report.total_pause_ms,
                "Scanned"
            ),
            Err(e) => {
                failed += 1;
                error!(path = %path.display(), error = %e, "Scan failed");
            }
        }
    }

    if config.output.summary {
        let snapshot = metrics.snapshot();
        let summary = serde_json::to_string(&snapshot).context("Failed to encode summary")?;
        info!(summary = %summary, "Pipeline metrics");
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", results.len());
    }
    Ok(())
}

/// Phase 1: Stderr-only tracing until the configuration is known.
fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gcscan=debug"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: Install the global subscriber described by the configuration.
fn init_tracing_from_config(config: &ScanConfig) -> Result<()> {
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Prefer RUST_LOG env var, fall back to config level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let (writer, ansi) = match &config.logging.output {
        LogOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogOutput::File { path } => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{path}'"))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
    };

    match config.logging.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(ansi)
                .with_writer(writer);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
    Ok(())
}
