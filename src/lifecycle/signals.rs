//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (and SIGTERM on unix)
//! - Run one shutdown sequence with the default timeout when it arrives
//!
//! # Design Decisions
//! - Armed at most once per trap, however many times startup runs
//! - Uses Tokio's signal handling (async-safe)
//! - The process is not exited here; the binary decides what to do afterwards

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::lifecycle::shutdown::ShutdownController;

type Trigger = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// One-shot bridge from termination signals to the shutdown controller.
pub struct SignalTrap {
    armed: AtomicBool,
    trigger: Trigger,
}

impl SignalTrap {
    /// Trap listening for OS termination signals.
    pub fn new() -> Self {
        Self::with_trigger(|| termination_signal().boxed())
    }

    /// Trap firing when the future built by `trigger` resolves.
    ///
    /// `trigger` is called once, on the first successful [`arm`](Self::arm).
    pub fn with_trigger<F, Fut>(trigger: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            armed: AtomicBool::new(false),
            trigger: Box::new(move || trigger().boxed()),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Install the signal wiring. Returns `false` if it was already installed.
    pub fn arm(&self, controller: Arc<ShutdownController>) -> bool {
        if self
            .armed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let signal = (self.trigger)();
        tokio::spawn(async move {
            signal.await;
            tracing::info!("Termination signal received");
            controller.shutdown(None).await;
        });
        tracing::debug!("Signal trap armed");
        true
    }
}

impl Default for SignalTrap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignalTrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalTrap")
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// Resolves on Ctrl+C or SIGTERM. Never resolves if no handler could be installed.
async fn termination_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
