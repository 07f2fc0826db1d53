//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::frame::FrameId;

/// Root configuration for the frame host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Startup pacing and shutdown deadline.
    pub lifecycle: LifecycleConfig,

    /// Log level, format and destination.
    pub logging: LoggingConfig,

    /// Metrics exporter settings.
    pub observability: ObservabilityConfig,

    /// Frames to create and register, in order.
    pub frames: Vec<FrameConfig>,
}

/// Lifecycle timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Pause between two frame starts in milliseconds.
    pub start_interval_ms: u64,

    /// Shutdown deadline in seconds when none is given explicitly.
    pub shutdown_timeout_secs: u64,
}

impl LifecycleConfig {
    pub fn start_interval(&self) -> Duration {
        Duration::from_millis(self.start_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            start_interval_ms: 1_000,
            shutdown_timeout_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "frame_host=debug". `RUST_LOG` overrides it.
    pub level: String,

    pub format: LogFormat,

    /// Append records to this file instead of stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Serve Prometheus metrics.
    pub metrics_enabled: bool,

    /// Metrics listener address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// One HTTP frame.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrameConfig {
    /// Frame name, unique together with `version`.
    pub name: String,

    /// Optional version suffix.
    #[serde(default)]
    pub version: Option<String>,

    /// Listen address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl FrameConfig {
    pub fn id(&self) -> FrameId {
        let id = FrameId::new(self.name.clone());
        match &self.version {
            Some(version) => id.with_version(version.clone()),
            None => id,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            version: None,
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}
