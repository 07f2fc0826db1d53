//! Shared utilities for lifecycle integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use frame_host::{Frame, FrameId, ShutdownToken};
use tokio::sync::Notify;
use tokio::time::Instant;

/// Ordered record of lifecycle events shared by frames and finalizers.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

/// Scripted frame: serves until shutdown, then reports a fixed verdict.
pub struct MockFrame {
    id: FrameId,
    graceful: bool,
    delay: Option<Duration>,
    panic_on_shutdown: bool,
    running: AtomicBool,
    stopped: Notify,
    events: EventLog,
    pub runs: AtomicUsize,
    pub shutdowns: AtomicUsize,
    seen_deadline: Mutex<Option<Instant>>,
}

impl MockFrame {
    pub fn new(name: &str) -> Self {
        Self {
            id: FrameId::new(name),
            graceful: true,
            delay: None,
            panic_on_shutdown: false,
            running: AtomicBool::new(false),
            stopped: Notify::new(),
            events: EventLog::default(),
            runs: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
            seen_deadline: Mutex::new(None),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.id = self.id.with_version(version);
        self
    }

    pub fn graceful(mut self, graceful: bool) -> Self {
        self.graceful = graceful;
        self
    }

    /// Time spent draining before reporting, cut short by the token.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_shutdown = true;
        self
    }

    pub fn already_running(self) -> Self {
        self.running.store(true, Ordering::SeqCst);
        self
    }

    pub fn events(mut self, events: &EventLog) -> Self {
        self.events = events.clone();
        self
    }

    pub fn seen_deadline(&self) -> Option<Instant> {
        *self.seen_deadline.lock().unwrap()
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Frame for MockFrame {
    fn id(&self) -> &FrameId {
        &self.id
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        self.events.push(format!("run:{}", self.id));
        self.stopped.notified().await;
        self.running.store(false, Ordering::SeqCst);
    }

    async fn shutdown(&self, token: ShutdownToken) -> bool {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        *self.seen_deadline.lock().unwrap() = Some(token.deadline());
        self.events.push(format!("stop-begin:{}", self.id));

        if self.panic_on_shutdown {
            panic!("frame {} exploded", self.id);
        }

        if let Some(delay) = self.delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = token.cancelled() => {
                    self.events.push(format!("stop-timeout:{}", self.id));
                    return false;
                }
            }
        }

        self.stopped.notify_one();
        self.running.store(false, Ordering::SeqCst);
        self.events.push(format!("stop-end:{}", self.id));
        self.graceful
    }
}

/// Build an `Arc<dyn Frame>` from a mock, keeping a typed handle.
pub fn shared(frame: MockFrame) -> (Arc<MockFrame>, Arc<dyn Frame>) {
    let typed = Arc::new(frame);
    let dynamic: Arc<dyn Frame> = typed.clone();
    (typed, dynamic)
}
