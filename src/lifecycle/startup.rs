//! Startup orchestration.
//!
//! # Responsibilities
//! - Dispatch `run` for every registered frame that is not already serving
//! - Pace dispatches so frames do not race each other for ports and resources
//!
//! # Design Decisions
//! - Fire-and-forget: `run` lives as long as the server, so it is never awaited
//! - Start failures surface through the frame's own logging, not here

use std::time::Duration;

use crate::observability::metrics;
use crate::registry::FrameRegistry;

/// Pause between two frame dispatches.
pub const START_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn `run` for every stopped frame. Returns how many were dispatched.
pub async fn start_all(registry: &FrameRegistry, interval: Duration) -> usize {
    let mut dispatched = 0;
    for frame in registry.list() {
        if frame.is_running() {
            tracing::debug!(frame = %frame.id(), "Frame already running");
            continue;
        }

        tracing::info!(frame = %frame.id(), "Starting frame");
        metrics::record_start(&frame.id().key());
        tokio::spawn(async move {
            frame.run().await;
        });
        dispatched += 1;

        tokio::time::sleep(interval).await;
    }
    dispatched
}
