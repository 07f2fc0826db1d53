//! Multi-frame server host.
//!
//! Runs several independent server instances ("frames") in one process and drives
//! their collective lifecycle: registration, paced startup, deadline-bounded graceful
//! shutdown and a finalizer that runs once every frame has stopped.

pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use config::schema::HostConfig;
pub use error::{BoxError, FrameError, HostError, RegistryError};
pub use frame::{Frame, FrameId};
pub use host::Host;
pub use http::HttpFrame;
pub use lifecycle::{ShutdownReport, ShutdownToken, SignalTrap};
pub use registry::FrameRegistry;
