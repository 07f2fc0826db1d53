//! Process-level host owning the frame registry and its lifecycle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::LifecycleConfig;
use crate::error::{BoxError, RegistryError};
use crate::frame::Frame;
use crate::lifecycle::{
    self, ShutdownController, ShutdownReport, ShutdownToken, SignalTrap, SHUTDOWN_TIMEOUT,
    START_INTERVAL,
};
use crate::observability::LogGuard;
use crate::registry::FrameRegistry;

/// Owns every frame in the process and drives their collective lifecycle.
///
/// ```ignore
/// let host = Host::from_config(&config.lifecycle, log_guard);
/// host.register_frame(HttpFrame::new(id, "0.0.0.0:8080", router));
/// host.start_all().await;
/// let report = host.wait_for_shutdown().await;
/// ```
#[derive(Debug)]
pub struct Host {
    registry: Arc<FrameRegistry>,
    controller: Arc<ShutdownController>,
    trap: SignalTrap,
    start_interval: Duration,
}

impl Host {
    /// Host with the default pacing and timeout, listening for OS signals.
    pub fn new() -> Self {
        Self::with_settings(START_INTERVAL, SHUTDOWN_TIMEOUT, LogGuard::disabled())
    }

    pub fn from_config(config: &LifecycleConfig, log: LogGuard) -> Self {
        Self::with_settings(config.start_interval(), config.shutdown_timeout(), log)
    }

    fn with_settings(start_interval: Duration, shutdown_timeout: Duration, log: LogGuard) -> Self {
        let registry = Arc::new(FrameRegistry::new());
        let controller = Arc::new(ShutdownController::new(
            Arc::clone(&registry),
            shutdown_timeout,
            log,
        ));
        Self {
            registry,
            controller,
            trap: SignalTrap::new(),
            start_interval,
        }
    }

    /// Replace the signal trap, e.g. with one driven by a test trigger.
    pub fn with_signal_trap(mut self, trap: SignalTrap) -> Self {
        self.trap = trap;
        self
    }

    pub fn with_start_interval(mut self, interval: Duration) -> Self {
        self.start_interval = interval;
        self
    }

    /// Register a frame, panicking on a duplicate key. Returns the shared handle.
    pub fn register_frame<F: Frame>(&self, frame: F) -> Arc<F> {
        let frame = Arc::new(frame);
        self.registry.register(frame.clone());
        frame
    }

    pub fn register_shared(&self, frame: Arc<dyn Frame>) {
        self.registry.register(frame);
    }

    pub fn try_register(&self, frame: Arc<dyn Frame>) -> Result<(), RegistryError> {
        self.registry.try_register(frame)
    }

    /// All frames in registration order.
    pub fn frames(&self) -> Vec<Arc<dyn Frame>> {
        self.registry.list()
    }

    pub fn frame(&self, name: &str, version: Option<&str>) -> Option<Arc<dyn Frame>> {
        self.registry.lookup(name, version)
    }

    /// Whether the named frame exists and is serving.
    pub fn is_running(&self, name: &str, version: Option<&str>) -> bool {
        self.frame(name, version)
            .map(|frame| frame.is_running())
            .unwrap_or(false)
    }

    pub fn set_finalizer<F, Fut>(&self, finalizer: F)
    where
        F: Fn(ShutdownToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.controller.set_finalizer(finalizer);
    }

    /// Start every stopped frame, then arm the signal trap.
    ///
    /// Safe to call again after registering more frames; running frames are skipped
    /// and the trap is only armed the first time.
    pub async fn start_all(&self) -> usize {
        let dispatched = lifecycle::start_all(&self.registry, self.start_interval).await;
        self.trap.arm(Arc::clone(&self.controller));
        dispatched
    }

    /// Shut down every frame and run the finalizer. `None` uses the default timeout.
    pub async fn shutdown(&self, timeout: Option<Duration>) -> ShutdownReport {
        self.controller.shutdown(timeout).await
    }

    /// Resolves with the report of the latest completed shutdown sequence,
    /// waiting for one if none has completed yet.
    pub async fn wait_for_shutdown(&self) -> Option<ShutdownReport> {
        let mut completed = self.controller.subscribe();
        let report = completed.wait_for(Option::is_some).await.ok()?;
        *report
    }

    pub fn registry(&self) -> &Arc<FrameRegistry> {
        &self.registry
    }

    pub fn signal_trap(&self) -> &SignalTrap {
        &self.trap
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}
