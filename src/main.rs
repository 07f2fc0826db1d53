//! Frame host binary.
//!
//! ```text
//!   ┌──────────────────────────── frame-host ────────────────────────────┐
//!   │                                                                    │
//!   │   config ──▶ Host ──▶ registry ──▶ [api] [api_v2] [admin] ...      │
//!   │               │                       ▲        ▲                   │
//!   │               │ start_all (paced)     │ run    │ shutdown(token)   │
//!   │               ▼                       │        │                   │
//!   │          signal trap ──SIGINT/TERM──▶ shutdown controller          │
//!   │                                           │                        │
//!   │                                           ▼                        │
//!   │                              finalizer → summary → close log       │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use frame_host::config::{load_config, FrameConfig, HostConfig};
use frame_host::error::{BoxError, HostError};
use frame_host::observability::{init_logging, metrics};
use frame_host::{Host, HttpFrame};

#[derive(Parser)]
#[command(name = "frame-host")]
#[command(about = "Run several HTTP frames in one process", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path).map_err(HostError::from)?,
        None => HostConfig::default(),
    };
    if config.frames.is_empty() {
        config.frames.push(FrameConfig::default());
    }

    let log_guard = init_logging(&config.logging).map_err(HostError::from)?;
    tracing::info!(pid = std::process::id(), "frame-host v0.1.0 starting");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e: std::net::AddrParseError| HostError::Metrics(e.to_string()))?;
        metrics::init_metrics(addr).map_err(|e| HostError::Metrics(e.to_string()))?;
    }

    let host = Host::from_config(&config.lifecycle, log_guard);
    for frame in &config.frames {
        host.register_frame(HttpFrame::from_config(frame));
    }
    host.set_finalizer(|token| async move {
        tracing::info!(
            remaining_ms = token.remaining().as_millis() as u64,
            "All frames stopped"
        );
        Ok::<(), BoxError>(())
    });

    let dispatched = host.start_all().await;
    tracing::info!(frames = dispatched, "Frames started");

    let graceful = host
        .wait_for_shutdown()
        .await
        .map(|report| report.graceful)
        .unwrap_or(false);

    Ok(if graceful {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
