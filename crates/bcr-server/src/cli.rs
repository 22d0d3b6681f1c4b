//! CLI module for bcr-server.
//!
//! This module provides the command-line interface that can be used either
//! as a standalone binary or as a subcommand of the main bcr CLI.

use std::io;
use std::path::PathBuf;

use bcr_config::{
    CliOverrides, Config, LoggingConfig, apply_overrides, load_config, validate_config,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{CancellationToken, run_with_shutdown};

/// Account server CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "bcr-server", version, about = "Account service with cached credential checks")]
pub struct ServerArgs {
    /// Config file path (json/jsonc/yaml/toml). Built-in defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Load, override and validate the configuration named by `args`.
pub fn resolve_config(args: &ServerArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;
    Ok(config)
}

/// Run the account server with the given arguments.
///
/// This is the main entry point for the server CLI, used by both the
/// standalone binary and the unified bcr CLI.
pub async fn run(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;

    init_tracing(&config.logging);

    if let Some(listen) = &config.metrics.listen {
        match bcr_metrics::init_prometheus(listen) {
            Ok(()) => info!("metrics exporter listening on {}", listen),
            Err(e) => warn!("failed to start metrics exporter: {}", e),
        }
    }

    // Set up graceful shutdown on SIGTERM/SIGINT
    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal_handler().await;
        info!("shutdown signal received");
        shutdown_signal.cancel();
    });

    run_with_shutdown(config, shutdown).await?;
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Build the filter string from the base level and per-module overrides.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = config.level.as_deref().unwrap_or("info").to_string();
    let mut modules: Vec<_> = config.filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        directives.push_str(&format!(",{module}={level}"));
    }
    directives
}

/// Initialize tracing subscriber with the given logging configuration.
///
/// `format` is json, pretty or compact (default pretty); `output` is stdout
/// or stderr (default stderr).
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match config.output.as_deref() {
        Some("stdout") => BoxMakeWriter::new(io::stdout),
        _ => BoxMakeWriter::new(io::stderr),
    };
    let layer = fmt::layer().with_writer(writer);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_deref() {
        Some("json") => registry.with(layer.json()).init(),
        Some("compact") => registry.with(layer.compact()).init(),
        _ => registry.with(layer).init(),
    }
}
