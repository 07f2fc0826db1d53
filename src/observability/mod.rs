//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry, controllers, frames produce:
//!     → logging.rs (structured log events, closable sink)
//!     → metrics.rs (registration gauge, start and shutdown counters)
//!
//! Consumers:
//!     → stdout or log file
//!     → Prometheus scrape (optional)
//! ```
//!
//! # Design Decisions
//! - The log sink is released last, after the shutdown summary line
//! - Metrics are cheap no-ops when no exporter is installed

pub mod logging;
pub mod metrics;

pub use logging::{build_logging, init_logging, LogGuard};
