//! Ecosystem classifiers.
//!
//! Each ecosystem owns a gate, a set of prioritized signal chains that fill a
//! [`ProjectDescriptor`], the template family it renders, and the
//! template-facing fields it contributes to the generation context.

mod dotnet;
mod gradle;
mod java;
mod jvm;
mod maven;
mod node;
mod python;

pub use dotnet::DotNetEcosystem;
pub use gradle::GradleEcosystem;
pub use java::JavaEcosystem;
pub use maven::MavenEcosystem;
pub use node::NodeEcosystem;
pub use python::PythonEcosystem;

use super::{EcosystemId, LanguageId, PlatformId, ProjectDescriptor};
use crate::fs::ProjectFiles;
use serde_json::{Map, Value};

/// Template-facing fields contributed by one ecosystem.
pub type ContextFields = Map<String, Value>;

pub trait Ecosystem: Send + Sync {
    fn id(&self) -> EcosystemId;

    fn language(&self) -> LanguageId;

    /// Runs the gate and, when it passes, every signal chain.
    ///
    /// Never fails once the gate passes; missing evidence falls through to
    /// the ecosystem default.
    fn detect(&self, files: &ProjectFiles) -> Option<ProjectDescriptor>;

    fn templates(&self) -> &'static PlatformTemplateMap;

    /// Ecosystem-specific context keys. The probes here may re-scan the tree.
    fn context_fields(&self, descriptor: &ProjectDescriptor, files: &ProjectFiles)
        -> ContextFields;
}

/// Template id and output path of one platform artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformTemplate {
    pub platform: PlatformId,
    pub template_id: &'static str,
    pub output_path: &'static str,
}

/// Immutable platform lookup of one template family.
#[derive(Debug)]
pub struct PlatformTemplateMap {
    family: &'static str,
    entries: &'static [PlatformTemplate],
}

impl PlatformTemplateMap {
    pub const fn new(family: &'static str, entries: &'static [PlatformTemplate]) -> Self {
        Self { family, entries }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn get(&self, platform: PlatformId) -> Option<&PlatformTemplate> {
        self.entries.iter().find(|entry| entry.platform == platform)
    }

    pub fn platforms(&self) -> Vec<PlatformId> {
        self.entries.iter().map(|entry| entry.platform).collect()
    }

    pub fn entries(&self) -> &'static [PlatformTemplate] {
        self.entries
    }
}

/// Builds the standard map of a template family: one entry per platform,
/// with output paths shared by every ecosystem.
macro_rules! platform_templates {
    ($family:literal) => {
        $crate::stack::ecosystem::PlatformTemplateMap::new(
            $family,
            &[
                $crate::stack::ecosystem::PlatformTemplate {
                    platform: $crate::stack::PlatformId::Jenkins,
                    template_id: concat!($family, "/Jenkinsfile.tera"),
                    output_path: "Jenkinsfile",
                },
                $crate::stack::ecosystem::PlatformTemplate {
                    platform: $crate::stack::PlatformId::Gitlab,
                    template_id: concat!($family, "/gitlab-ci.yml.tera"),
                    output_path: ".gitlab-ci.yml",
                },
                $crate::stack::ecosystem::PlatformTemplate {
                    platform: $crate::stack::PlatformId::Github,
                    template_id: concat!($family, "/github-ci.yml.tera"),
                    output_path: ".github/workflows/ci.yml",
                },
                $crate::stack::ecosystem::PlatformTemplate {
                    platform: $crate::stack::PlatformId::Docker,
                    template_id: concat!($family, "/Dockerfile.tera"),
                    output_path: "Dockerfile",
                },
            ],
        )
    };
}
pub(crate) use platform_templates;
