//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::TreeLoader;
use crate::config::Settings;
use crate::domain::LabelRegistry;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Tooltip bindings available to every session
    pub labels: Arc<LabelRegistry>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            LabelRegistry::with_builtins(),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>, labels: LabelRegistry) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            labels: Arc::new(labels),
        }
    }

    pub fn loader(&self) -> TreeLoader {
        TreeLoader::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.settings),
            Arc::clone(&self.labels),
        )
    }
}
