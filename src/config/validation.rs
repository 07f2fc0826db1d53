//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Frame identities unique, bind addresses parseable and distinct
//! - Value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before any frame is registered, so registration never hits a duplicate

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::HostConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("frame #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("frame {key} is declared more than once")]
    DuplicateFrame { key: String },

    #[error("frame {key} has invalid bind address {address}")]
    InvalidAddress { key: String, address: String },

    #[error("frames share bind address {address}")]
    SharedAddress { address: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: String },

    #[error("invalid log level {0:?}")]
    LogLevel(String),

    #[error("invalid metrics address {0}")]
    MetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.lifecycle.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "lifecycle.shutdown_timeout_secs".into(),
        });
    }

    if EnvFilter::try_new(&config.logging.level).is_err() {
        errors.push(ValidationError::LogLevel(config.logging.level.clone()));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut keys = HashSet::new();
    let mut addresses = HashSet::new();
    for (index, frame) in config.frames.iter().enumerate() {
        if frame.name.is_empty() {
            errors.push(ValidationError::EmptyName { index });
            continue;
        }
        let key = frame.id().key();

        if !keys.insert(key.clone()) {
            errors.push(ValidationError::DuplicateFrame { key: key.clone() });
        }

        match frame.bind_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if !addresses.insert(addr) {
                    errors.push(ValidationError::SharedAddress {
                        address: frame.bind_address.clone(),
                    });
                }
            }
            Err(_) => errors.push(ValidationError::InvalidAddress {
                key: key.clone(),
                address: frame.bind_address.clone(),
            }),
        }

        if frame.request_timeout_secs == 0 {
            errors.push(ValidationError::ZeroValue {
                field: format!("frames.{}.request_timeout_secs", key),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::FrameConfig;

    fn frame(name: &str, version: Option<&str>, address: &str) -> FrameConfig {
        FrameConfig {
            name: name.into(),
            version: version.map(Into::into),
            bind_address: address.into(),
            ..FrameConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&HostConfig::default()), Ok(()));
    }

    #[test]
    fn versions_make_names_distinct() {
        let mut config = HostConfig::default();
        config.frames.push(frame("api", None, "127.0.0.1:8080"));
        config.frames.push(frame("api", Some("v2"), "127.0.0.1:8081"));
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = HostConfig::default();
        config.lifecycle.shutdown_timeout_secs = 0;
        config.frames.push(frame("", None, "127.0.0.1:8080"));
        config.frames.push(frame("api", None, "127.0.0.1:8080"));
        config.frames.push(frame("api", None, "127.0.0.1:8080"));
        config.frames.push(frame("web", None, "not-an-address"));

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroValue {
            field: "lifecycle.shutdown_timeout_secs".into()
        }));
        assert!(errors.contains(&ValidationError::EmptyName { index: 0 }));
        assert!(errors.contains(&ValidationError::DuplicateFrame { key: "api".into() }));
        assert!(errors.contains(&ValidationError::SharedAddress {
            address: "127.0.0.1:8080".into()
        }));
        assert!(errors.contains(&ValidationError::InvalidAddress {
            key: "web".into(),
            address: "not-an-address".into()
        }));
    }

    #[test]
    fn bad_metrics_address_only_matters_when_enabled() {
        let mut config = HostConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MetricsAddress("nowhere".into())])
        );
    }
}
