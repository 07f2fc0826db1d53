//! HTTP frames.
//!
//! # Data Flow
//! ```text
//! Host::start_all
//!     → server.rs (HttpFrame::run: bind, serve with graceful shutdown)
//!     → request.rs (x-request-id on every request and response)
//!     → application router
//!
//! Host::shutdown
//!     → HttpFrame::shutdown (stop accepting, drain, report against the deadline)
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{default_router, HttpFrame};
