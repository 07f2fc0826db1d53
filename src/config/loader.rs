//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HostConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<HostConfig, ConfigError> {
    let config: HostConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::io::Write;

    #[test]
    fn load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[lifecycle]
start_interval_ms = 250
shutdown_timeout_secs = 5

[logging]
level = "debug"
format = "json"
file = "log/host.log"

[[frames]]
name = "api"
bind_address = "127.0.0.1:8080"

[[frames]]
name = "api"
version = "v2"
bind_address = "127.0.0.1:8081"
request_timeout_secs = 10
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.lifecycle.start_interval_ms, 250);
        assert_eq!(config.lifecycle.shutdown_timeout_secs, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.frames.len(), 2);
        assert_eq!(config.frames[0].id().key(), "api");
        assert_eq!(config.frames[0].request_timeout_secs, 30);
        assert_eq!(config.frames[1].id().key(), "api_v2");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.lifecycle.start_interval_ms, 1_000);
        assert_eq!(config.lifecycle.shutdown_timeout_secs, 60);
        assert!(config.frames.is_empty());
    }

    #[test]
    fn duplicate_frames_fail_validation() {
        let err = parse_config(
            r#"
[[frames]]
name = "api"
bind_address = "127.0.0.1:8080"

[[frames]]
name = "api"
bind_address = "127.0.0.1:8081"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("api"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/frame-host.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
