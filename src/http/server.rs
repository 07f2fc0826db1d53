//! HTTP frame.
//!
//! # Responsibilities
//! - Serve an Axum router on the frame's bind address
//! - Wire up middleware (request ID, tracing, timeout)
//! - Stop on request and drain in-flight connections
//! - Report whether draining finished before the shutdown deadline

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::{routing::get, Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::FrameConfig;
use crate::error::FrameError;
use crate::frame::{Frame, FrameId};
use crate::http::request::UuidRequestId;
use crate::lifecycle::ShutdownToken;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stop handshake between `run` and `shutdown`, guarded by one mutex.
#[derive(Default)]
struct StopState {
    /// Stop signal for the current serve loop.
    current: CancellationToken,
    /// Deadline of a shutdown that found the frame stopped. A `run` claiming
    /// before it passes was spawned ahead of that shutdown and must not serve.
    pending: Option<Instant>,
}

/// A frame serving HTTP with Axum.
pub struct HttpFrame {
    id: FrameId,
    bind_address: String,
    router: Router,
    /// `true` while the serve loop owns the listener.
    running: watch::Sender<bool>,
    stop: Mutex<StopState>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl HttpFrame {
    /// Create a frame serving `router` with the default request timeout.
    pub fn new(id: FrameId, bind_address: impl Into<String>, router: Router) -> Self {
        Self::with_timeout(id, bind_address, router, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        id: FrameId,
        bind_address: impl Into<String>,
        router: Router,
        request_timeout: Duration,
    ) -> Self {
        let (running, _) = watch::channel(false);
        Self {
            id,
            bind_address: bind_address.into(),
            router: Self::build_router(router, request_timeout),
            running,
            stop: Mutex::new(StopState::default()),
            local_addr: Mutex::new(None),
        }
    }

    /// Frame from config, serving [`default_router`].
    pub fn from_config(config: &FrameConfig) -> Self {
        let id = config.id();
        let router = default_router(&id);
        Self::with_timeout(id, config.bind_address.clone(), router, config.request_timeout())
    }

    /// Wrap the application router with the frame's middleware stack.
    #[allow(deprecated)]
    fn build_router(router: Router, request_timeout: Duration) -> Router {
        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(request_timeout)),
        )
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    /// Address bound by the current serve loop.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    async fn serve(&self, stop: CancellationToken) -> Result<(), FrameError> {
        let addr: SocketAddr =
            self.bind_address
                .parse()
                .map_err(|source| FrameError::Address {
                    address: self.bind_address.clone(),
                    source,
                })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| FrameError::Bind {
                address: self.bind_address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(FrameError::Serve)?;
        *self.local_addr.lock() = Some(local_addr);

        tracing::info!(frame = %self.id, address = %local_addr, "Frame serving");

        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(stop.cancelled_owned())
            .await
            .map_err(FrameError::Serve)
    }
}

#[async_trait]
impl Frame for HttpFrame {
    fn id(&self) -> &FrameId {
        &self.id
    }

    fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    async fn run(&self) {
        let stop = CancellationToken::new();
        {
            let mut state = self.stop.lock();
            if *self.running.borrow() {
                tracing::warn!(frame = %self.id, "Frame is already running");
                return;
            }
            if let Some(deadline) = state.pending.take() {
                if Instant::now() < deadline {
                    tracing::info!(frame = %self.id, "Frame stopped before it started serving");
                    return;
                }
            }
            state.current = stop.clone();
            self.running.send_replace(true);
        }

        match self.serve(stop).await {
            Ok(()) => tracing::info!(frame = %self.id, "Frame stopped"),
            Err(e) => tracing::error!(frame = %self.id, error = %e, "Frame failed"),
        }
        *self.local_addr.lock() = None;
        self.running.send_replace(false);
    }

    async fn shutdown(&self, token: ShutdownToken) -> bool {
        {
            let mut state = self.stop.lock();
            if !*self.running.borrow() {
                state.pending = Some(token.deadline());
                return true;
            }
            state.pending = None;
            state.current.cancel();
        }

        let mut running = self.running.subscribe();
        let stopped = async move {
            while *running.borrow_and_update() {
                if running.changed().await.is_err() {
                    break;
                }
            }
        };

        tokio::select! {
            _ = stopped => true,
            _ = token.cancelled() => {
                tracing::warn!(frame = %self.id, "Frame still draining at the shutdown deadline");
                false
            }
        }
    }
}

impl std::fmt::Debug for HttpFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFrame")
            .field("id", &self.id)
            .field("bind_address", &self.bind_address)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Router answering `GET /_frame` with the frame's identity.
pub fn default_router(id: &FrameId) -> Router {
    let info = json!({
        "frame": id.key(),
        "name": id.name(),
        "version": id.version(),
    });
    Router::new().route(
        "/_frame",
        get(move || {
            let info = info.clone();
            async move { Json(info) }
        }),
    )
}
