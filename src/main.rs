//! Fleetsense prediction service
//!
//! Loads a fitted failure classifier artifact at startup and serves
//! failure-probability predictions over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (artifact at ./pd_24h_model.json, port 8080)
//! cargo run --release --bin fleetsense
//!
//! # Point at a specific artifact and address
//! ./fleetsense --artifact models/pd_24h_model.json --addr 127.0.0.1:9000
//! ```
//!
//! # Environment Variables
//!
//! - `FLEETSENSE_CONFIG`: Path to a TOML config file (see config module)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use fleetsense::api::{create_app, ApiState};
use fleetsense::config::ServiceConfig;
use fleetsense::model;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "fleetsense")]
#[command(about = "Fleetsense predictive maintenance prediction service")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Override the model artifact path (default: "pd_24h_model.json")
    #[arg(long)]
    artifact: Option<String>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = ServiceConfig::load();
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(artifact) = args.artifact {
        config.model.artifact_path = artifact.into();
    }
    config.validate().context("Invalid configuration")?;

    // Load the model artifact once; a missing or corrupt artifact is fatal.
    let artifact = model::load_from_disk(&config.model.artifact_path).with_context(|| {
        format!(
            "Failed to load model artifact from {}",
            config.model.artifact_path.display()
        )
    })?;
    info!(
        path = %config.model.artifact_path.display(),
        features = artifact.feature_cols.len(),
        "Model artifact loaded"
    );

    let state = ApiState::new(Arc::new(artifact));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.addr))?;
    info!("HTTP server listening on {}", config.server.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Graceful shutdown complete");
    Ok(())
}

/// Resolve when the process receives ctrl-c.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}
