//! Frame contract.
//!
//! # Data Flow
//! ```text
//! Host::start_all
//!     → tokio::spawn(frame.run())        (fire-and-forget, lives as long as the server)
//!
//! Host::shutdown
//!     → frame.shutdown(token)            (one task per frame, shared deadline)
//!     → bool verdict folded into the aggregate
//! ```
//!
//! # Contract
//! - `is_running` is owned by the frame; the host never caches it.
//! - `run` reports its own failures through logging; the host never sees them.
//! - `shutdown` must watch the token and return by its deadline. Cancellation is
//!   cooperative: a frame that ignores the token blocks the whole shutdown sequence.

pub mod id;

use async_trait::async_trait;

use crate::lifecycle::token::ShutdownToken;

pub use id::{key_for, FrameId};

/// A named, versioned server instance managed by the host.
#[async_trait]
pub trait Frame: Send + Sync + 'static {
    /// Stable identity used for uniqueness and lookup.
    fn id(&self) -> &FrameId;

    /// Whether the serve loop is currently active.
    fn is_running(&self) -> bool;

    /// Serve until stopped. Spawned as an independent task by the host.
    async fn run(&self);

    /// Stop serving, honoring the token's deadline.
    ///
    /// Returns `true` if the frame stopped gracefully before the deadline. Implementations
    /// must select on [`ShutdownToken::cancelled`] (or check [`ShutdownToken::remaining`])
    /// and return once it fires.
    async fn shutdown(&self, token: ShutdownToken) -> bool;
}
