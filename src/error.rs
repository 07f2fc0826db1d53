//! Error types shared across the host.

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::observability::logging::LoggingError;

/// Boxed error returned by finalizers and other user-supplied hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Registration failures.
///
/// [`FrameRegistry::register`](crate::registry::FrameRegistry::register) treats both
/// variants as fatal; `try_register` hands them back for callers that validate first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("frame name must not be empty")]
    EmptyName,

    #[error("frame {key} is registered repeatedly")]
    Duplicate { key: String },
}

/// Errors raised by a frame while serving.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid bind address {address}: {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("serve loop failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// Top-level error for building and running a host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("metrics exporter: {0}")]
    Metrics(String),
}
