//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Registry snapshot → spawn run() per stopped frame → pause → next frame
//!     → arm signal trap (once)
//!
//! Shutdown (shutdown.rs):
//!     Signal or explicit call → shared deadline token → all frames concurrently
//!     → barrier → finalizer → summary line → close log sink
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown with the default timeout
//! ```
//!
//! # Design Decisions
//! - Paced startup: one frame per interval
//! - Cooperative shutdown: the deadline is advisory, nothing is killed
//! - Signal wiring is installed at most once

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod token;

pub use shutdown::{Finalizer, ShutdownController, ShutdownReport, SHUTDOWN_TIMEOUT};
pub use signals::SignalTrap;
pub use startup::{start_all, START_INTERVAL};
pub use token::ShutdownToken;
