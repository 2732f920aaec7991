use super::{BuildSystemId, EcosystemId, LanguageId};
use serde::Serialize;
use std::path::PathBuf;

/// Canonical classification result produced by exactly one ecosystem classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDescriptor {
    pub language: LanguageId,
    /// Web or application framework; `None` means a generic project of the language.
    pub framework: Option<String>,
    /// Normalized `MAJOR.MINOR` (or bare `MAJOR`) runtime version.
    pub runtime_version: String,
    pub test_framework: String,
    #[serde(flatten)]
    pub details: EcosystemDetails,
    /// Attached by the caller after detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<PathBuf>,
}

/// Fields that only exist for one ecosystem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EcosystemDetails {
    Python {
        package_manager: BuildSystemId,
    },
    Node {
        package_manager: BuildSystemId,
    },
    Maven {
        build_tool: BuildSystemId,
        is_multi_module: bool,
        packaging: String,
    },
    Gradle {
        build_tool: BuildSystemId,
        uses_kotlin_dsl: bool,
        is_multi_project: bool,
        packaging: String,
    },
    Java {
        build_tool: BuildSystemId,
        packaging: String,
    },
    DotNet {
        project_type: String,
        has_solution: bool,
        is_web_app: bool,
    },
}

impl ProjectDescriptor {
    pub fn new(
        language: LanguageId,
        runtime_version: impl Into<String>,
        test_framework: impl Into<String>,
        details: EcosystemDetails,
    ) -> Self {
        Self {
            language,
            framework: None,
            runtime_version: runtime_version.into(),
            test_framework: test_framework.into(),
            details,
            project_path: None,
        }
    }

    pub fn with_framework(mut self, framework: Option<impl Into<String>>) -> Self {
        self.framework = framework.map(Into::into);
        self
    }

    pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = Some(path.into());
        self
    }

    /// Ecosystem whose classifier produced this descriptor.
    pub fn ecosystem(&self) -> EcosystemId {
        match self.details {
            EcosystemDetails::Python { .. } => EcosystemId::Python,
            EcosystemDetails::Node { .. } => EcosystemId::Node,
            EcosystemDetails::Maven { .. } => EcosystemId::Maven,
            EcosystemDetails::Gradle { .. } => EcosystemId::Gradle,
            EcosystemDetails::Java { .. } => EcosystemId::Java,
            EcosystemDetails::DotNet { .. } => EcosystemId::DotNet,
        }
    }

    /// Package manager for ecosystems that report one.
    pub fn package_manager(&self) -> Option<BuildSystemId> {
        match &self.details {
            EcosystemDetails::Python { package_manager }
            | EcosystemDetails::Node { package_manager } => Some(*package_manager),
            _ => None,
        }
    }

    /// Build tool for the JVM ecosystems.
    pub fn build_tool(&self) -> Option<BuildSystemId> {
        match &self.details {
            EcosystemDetails::Maven { build_tool, .. }
            | EcosystemDetails::Gradle { build_tool, .. }
            | EcosystemDetails::Java { build_tool, .. } => Some(*build_tool),
            _ => None,
        }
    }
}
