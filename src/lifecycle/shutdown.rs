//! Shutdown coordination across all registered frames.
//!
//! # Sequence
//! ```text
//! token = now + timeout
//!     → frame.shutdown(token) for every frame, concurrently
//!     → wait for all of them
//!     → finalizer(token), if set
//!     → one summary line
//!     → close the log sink
//! ```
//!
//! # Design Decisions
//! - Verdict starts graceful and is only ever downgraded
//! - No step aborts the sequence; every frame and the finalizer always get their turn
//! - Sequences are serialized; a second call waits for the first, then runs in full
//!   against a deadline counted from its own call

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{join_all, BoxFuture};
use futures_util::FutureExt;
use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;

use crate::error::BoxError;
use crate::lifecycle::token::ShutdownToken;
use crate::observability::{metrics, LogGuard};
use crate::registry::FrameRegistry;

/// Time allowed for a shutdown sequence when the caller gives none.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// Cleanup hook run after every frame has stopped.
pub type Finalizer =
    Arc<dyn Fn(ShutdownToken) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// Outcome of one shutdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// All frames and the finalizer stopped cleanly.
    pub graceful: bool,
    /// Number of frames asked to shut down.
    pub frames: usize,
    /// Deadline shared by every participant.
    pub deadline: Instant,
}

/// Drives deadline-bounded shutdown of every frame in a registry.
pub struct ShutdownController {
    registry: Arc<FrameRegistry>,
    finalizer: RwLock<Option<Finalizer>>,
    default_timeout: Duration,
    log: LogGuard,
    sequence: Mutex<()>,
    completed: watch::Sender<Option<ShutdownReport>>,
}

impl ShutdownController {
    pub fn new(registry: Arc<FrameRegistry>, default_timeout: Duration, log: LogGuard) -> Self {
        let (completed, _) = watch::channel(None);
        Self {
            registry,
            finalizer: RwLock::new(None),
            default_timeout,
            log,
            sequence: Mutex::new(()),
            completed,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Set the cleanup hook, replacing any previous one.
    pub fn set_finalizer<F, Fut>(&self, finalizer: F)
    where
        F: Fn(ShutdownToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let finalizer: Finalizer = Arc::new(move |token| finalizer(token).boxed());
        *self.finalizer.write() = Some(finalizer);
    }

    pub fn has_finalizer(&self) -> bool {
        self.finalizer.read().is_some()
    }

    /// Receiver that observes the report of each completed sequence.
    pub fn subscribe(&self) -> watch::Receiver<Option<ShutdownReport>> {
        self.completed.subscribe()
    }

    /// Shut down every registered frame, then run the finalizer.
    ///
    /// `None` uses the controller's default timeout.
    pub async fn shutdown(&self, timeout: Option<Duration>) -> ShutdownReport {
        // The deadline counts from the call, including time queued behind another sequence.
        let timeout = timeout.unwrap_or(self.default_timeout);
        let token = ShutdownToken::with_timeout(timeout);
        let _sequence = self.sequence.lock().await;

        let frames = self.registry.list();
        tracing::info!(
            frames = frames.len(),
            timeout_secs = timeout.as_secs_f64(),
            "Shutting down frames..."
        );

        let graceful = Arc::new(AtomicBool::new(true));

        let tasks: Vec<_> = frames
            .iter()
            .map(|frame| {
                let frame = Arc::clone(frame);
                let token = token.clone();
                let graceful = Arc::clone(&graceful);
                tokio::spawn(async move {
                    if !frame.shutdown(token).await {
                        graceful.store(false, Ordering::SeqCst);
                        tracing::debug!(frame = %frame.id(), "Frame stopped without grace");
                    }
                })
            })
            .collect();

        // Barrier: the finalizer never overlaps a frame shutdown.
        for result in join_all(tasks).await {
            if let Err(e) = result {
                graceful.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "Frame shutdown task failed");
            }
        }

        let finalizer = self.finalizer.read().clone();
        if let Some(finalizer) = finalizer {
            let finalized = AssertUnwindSafe(async { finalizer(token.clone()).await })
                .catch_unwind()
                .await;
            match finalized {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    graceful.store(false, Ordering::SeqCst);
                    tracing::error!(finalizer = true, error = %e, "Finalizer failed");
                }
                Err(_) => {
                    graceful.store(false, Ordering::SeqCst);
                    tracing::error!(finalizer = true, "Finalizer panicked");
                }
            }
        }
        token.cancel();

        let report = ShutdownReport {
            graceful: graceful.load(Ordering::SeqCst),
            frames: frames.len(),
            deadline: token.deadline(),
        };
        metrics::record_shutdown(report.graceful);

        if report.graceful {
            tracing::info!(frames = report.frames, "Frames shut down gracefully");
        } else {
            tracing::warn!(frames = report.frames, "Frames shut down, but not gracefully");
        }

        self.log.close();
        self.completed.send_replace(Some(report));
        report
    }
}

impl std::fmt::Debug for ShutdownController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownController")
            .field("registry", &self.registry)
            .field("default_timeout", &self.default_timeout)
            .field("finalizer", &self.has_finalizer())
            .finish()
    }
}
