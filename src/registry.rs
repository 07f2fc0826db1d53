//! Frame registry.
//!
//! # Responsibilities
//! - Hold every frame created in the process, in registration order
//! - Reject duplicate effective keys at registration time
//! - Serve snapshots and lookups to the lifecycle controllers
//!
//! # Design Decisions
//! - Reader/writer lock: registration is exclusive, list/lookup are shared
//! - Entries are never removed
//! - Duplicate registration is a programming error and panics

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::RegistryError;
use crate::frame::{key_for, Frame};
use crate::observability::metrics;

/// Ordered collection of frames keyed by name and version.
#[derive(Default)]
pub struct FrameRegistry {
    frames: RwLock<Vec<Arc<dyn Frame>>>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame, panicking on an empty name or a duplicate key.
    ///
    /// The registry is left untouched when the registration is rejected.
    pub fn register(&self, frame: Arc<dyn Frame>) {
        if let Err(e) = self.try_register(frame) {
            tracing::error!(error = %e, "Frame registration rejected");
            panic!("{}", e);
        }
    }

    /// Register a frame, returning the rejection instead of panicking.
    pub fn try_register(&self, frame: Arc<dyn Frame>) -> Result<(), RegistryError> {
        if frame.id().name().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let key = frame.id().key();

        let mut frames = self.frames.write();
        if frames.iter().any(|f| f.id().key() == key) {
            return Err(RegistryError::Duplicate { key });
        }
        frames.push(frame);
        let count = frames.len();
        drop(frames);

        metrics::record_registered(count);
        tracing::debug!(frame = %key, registered = count, "Frame registered");
        Ok(())
    }

    /// Snapshot of all frames in registration order.
    pub fn list(&self) -> Vec<Arc<dyn Frame>> {
        self.frames.read().clone()
    }

    /// Find a frame by name and optional version.
    pub fn lookup(&self, name: &str, version: Option<&str>) -> Option<Arc<dyn Frame>> {
        let key = key_for(name, version);
        self.frames
            .read()
            .iter()
            .find(|f| f.id().key() == key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.frames.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.read().is_empty()
    }
}

impl std::fmt::Debug for FrameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.frames.read().iter().map(|fr| fr.id().key()).collect();
        f.debug_struct("FrameRegistry").field("frames", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameId;
    use crate::lifecycle::token::ShutdownToken;
    use async_trait::async_trait;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct Idle(FrameId);

    #[async_trait]
    impl Frame for Idle {
        fn id(&self) -> &FrameId {
            &self.0
        }
        fn is_running(&self) -> bool {
            false
        }
        async fn run(&self) {}
        async fn shutdown(&self, _token: ShutdownToken) -> bool {
            true
        }
    }

    fn frame(name: &str, version: &str) -> Arc<dyn Frame> {
        Arc::new(Idle(FrameId::new(name).with_version(version)))
    }

    #[test]
    fn versioned_frames_are_distinct() {
        let registry = FrameRegistry::new();
        registry.register(frame("api", ""));
        registry.register(frame("api", "v2"));

        let keys: Vec<String> = registry.list().iter().map(|f| f.id().key()).collect();
        assert_eq!(keys, vec!["api", "api_v2"]);
    }

    #[test]
    fn duplicate_is_fatal_and_leaves_registry_intact() {
        let registry = FrameRegistry::new();
        registry.register(frame("api", ""));
        registry.register(frame("api", "v2"));

        let result = catch_unwind(AssertUnwindSafe(|| registry.register(frame("api", ""))));
        assert!(result.is_err(), "duplicate registration must panic");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    #[should_panic(expected = "frame api_v2 is registered repeatedly")]
    fn duplicate_versioned_panics_with_key() {
        let registry = FrameRegistry::new();
        registry.register(frame("api", "v2"));
        registry.register(frame("api", "v2"));
    }

    #[test]
    fn try_register_reports_rejections() {
        let registry = FrameRegistry::new();
        assert_eq!(registry.try_register(frame("", "v1")), Err(RegistryError::EmptyName));
        registry.try_register(frame("web", "")).unwrap();
        assert_eq!(
            registry.try_register(frame("web", "")),
            Err(RegistryError::Duplicate { key: "web".into() })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_by_name_and_version() {
        let registry = FrameRegistry::new();
        assert!(registry.lookup("ghost", None).is_none());

        registry.register(frame("api", ""));
        registry.register(frame("api", "v2"));

        assert_eq!(registry.lookup("api", None).unwrap().id().key(), "api");
        assert_eq!(registry.lookup("api", Some("v2")).unwrap().id().key(), "api_v2");
        assert_eq!(registry.lookup("api", Some("")).unwrap().id().key(), "api");
        assert!(registry.lookup("api", Some("v3")).is_none());
        assert!(registry.lookup("ghost", None).is_none());
    }

    #[test]
    fn list_is_a_snapshot() {
        let registry = FrameRegistry::new();
        registry.register(frame("a", ""));
        let snapshot = registry.list();
        registry.register(frame("b", ""));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn concurrent_registration_keeps_keys_unique() {
        let registry = Arc::new(FrameRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let mut accepted = 0usize;
                    // Every thread races on the same 16 keys.
                    for n in 0..16 {
                        if registry.try_register(frame(&format!("f{}", n), "")).is_ok() {
                            accepted += 1;
                        }
                    }
                    accepted
                })
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 16);
        assert_eq!(registry.len(), 16);
    }
}
