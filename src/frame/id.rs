//! Frame identity.

use std::fmt;

/// Name and optional version of a frame.
///
/// The effective key is `name` when there is no version, `name_version` otherwise.
/// An empty version string is treated as no version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameId {
    name: String,
    version: Option<String>,
}

impl FrameId {
    /// Identity without a version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Attach a version. An empty string clears it.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = if version.is_empty() { None } else { Some(version) };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Effective registry key.
    pub fn key(&self) -> String {
        key_for(&self.name, self.version.as_deref())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}_{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

/// Compute the effective key for a name and optional version.
pub fn key_for(name: &str, version: Option<&str>) -> String {
    match version {
        Some(v) if !v.is_empty() => format!("{}_{}", name, v),
        _ => name.to_string(),
    }
}
