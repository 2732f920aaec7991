use super::ecosystem::*;
use super::{EcosystemId, ProjectDescriptor};
use crate::error::{closest_match, PipeforgeError};
use crate::fs::{resolve_path, ProjectFiles};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered set of ecosystem classifiers.
///
/// Classification is first match in declaration order, so build-tool specific
/// ecosystems are registered before the generic fallbacks.
pub struct EcosystemRegistry {
    ecosystems: Vec<Arc<dyn Ecosystem>>,
}

impl EcosystemRegistry {
    pub fn new() -> Self {
        Self {
            ecosystems: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PythonEcosystem));
        registry.register(Arc::new(NodeEcosystem));
        registry.register(Arc::new(MavenEcosystem));
        registry.register(Arc::new(GradleEcosystem));
        registry.register(Arc::new(JavaEcosystem));
        registry.register(Arc::new(DotNetEcosystem));
        registry
    }

    /// Appends a classifier; it is consulted after every earlier one.
    pub fn register(&mut self, ecosystem: Arc<dyn Ecosystem>) {
        self.ecosystems.push(ecosystem);
    }

    pub fn ecosystems(&self) -> impl Iterator<Item = &dyn Ecosystem> {
        self.ecosystems.iter().map(|e| e.as_ref())
    }

    pub fn ids(&self) -> Vec<EcosystemId> {
        self.ecosystems().map(|e| e.id()).collect()
    }

    pub fn get(&self, id: EcosystemId) -> Option<&dyn Ecosystem> {
        self.ecosystems().find(|e| e.id() == id)
    }

    /// Resolves an explicit ecosystem name without touching the file system.
    pub fn resolve(&self, name: &str) -> Result<&dyn Ecosystem, PipeforgeError> {
        let wanted = name.trim().to_lowercase();
        EcosystemId::from_name(&wanted)
            .and_then(|id| self.get(id))
            .ok_or_else(|| {
                let available: Vec<String> =
                    self.ids().iter().map(|id| id.as_str().to_string()).collect();
                PipeforgeError::UnknownEcosystem {
                    name: name.to_string(),
                    suggestion: closest_match(&wanted, available.iter().map(String::as_str)),
                    available,
                }
            })
    }

    /// Classifies a project with the given readers.
    ///
    /// With `forced`, only that ecosystem is consulted; otherwise the first
    /// classifier in registry order whose gate passes wins.
    pub fn classify_files(
        &self,
        files: &ProjectFiles,
        forced: Option<&str>,
    ) -> Result<(EcosystemId, ProjectDescriptor), PipeforgeError> {
        let candidates: Vec<&dyn Ecosystem> = match forced {
            Some(name) => vec![self.resolve(name)?],
            None => self.ecosystems().collect(),
        };

        for ecosystem in candidates {
            debug!(ecosystem = %ecosystem.id(), "trying classifier");
            if let Some(descriptor) = ecosystem.detect(files) {
                let descriptor = descriptor.with_project_path(files.root());
                info!(
                    ecosystem = %ecosystem.id(),
                    framework = descriptor.framework.as_deref().unwrap_or("none"),
                    version = %descriptor.runtime_version,
                    "Detected project"
                );
                return Ok((ecosystem.id(), descriptor));
            }
        }

        Err(PipeforgeError::NoEcosystemDetected {
            path: files.root().to_path_buf(),
            supported: self.ids().iter().map(|id| id.as_str().to_string()).collect(),
        })
    }

    /// Classifies the project at `path` on disk; the descriptor carries the
    /// resolved absolute project path.
    pub fn classify(
        &self,
        path: &Path,
        forced: Option<&str>,
    ) -> Result<(EcosystemId, ProjectDescriptor), PipeforgeError> {
        if let Some(name) = forced {
            self.resolve(name)?;
        }
        let root = resolve_path(path);
        self.classify_files(&ProjectFiles::on_disk(root), forced)
    }
}

impl Default for EcosystemRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
