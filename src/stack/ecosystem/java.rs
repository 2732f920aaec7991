//! Plain Java sources without a build tool.

use super::jvm::{
    self, BUILD_MANIFESTS, DEFAULT_JAVA_VERSION, DEFAULT_PACKAGING, DEFAULT_TEST_FRAMEWORK,
};
use super::{ContextFields, Ecosystem, PlatformTemplateMap};
use crate::fs::ProjectFiles;
use crate::stack::descriptor::EcosystemDetails;
use crate::stack::{BuildSystemId, EcosystemId, LanguageId, ProjectDescriptor};
use tracing::debug;

pub struct JavaEcosystem;

impl Ecosystem for JavaEcosystem {
    fn id(&self) -> EcosystemId {
        EcosystemId::Java
    }

    fn language(&self) -> LanguageId {
        LanguageId::Java
    }

    fn detect(&self, files: &ProjectFiles) -> Option<ProjectDescriptor> {
        if !files.has_file_with_extension("java") {
            return None;
        }
        // Never pre-empt the build-tool classifiers, whatever the registry order.
        if let Some(manifest) = BUILD_MANIFESTS.iter().find(|m| files.file_exists(m)) {
            debug!(manifest, "java sources belong to a build tool project");
            return None;
        }

        let version = jvm::pinned_java_version(files)
            .unwrap_or_else(|| DEFAULT_JAVA_VERSION.to_string());

        Some(ProjectDescriptor::new(
            LanguageId::Java,
            version,
            DEFAULT_TEST_FRAMEWORK,
            EcosystemDetails::Java {
                build_tool: BuildSystemId::None,
                packaging: DEFAULT_PACKAGING.to_string(),
            },
        ))
    }

    fn templates(&self) -> &'static PlatformTemplateMap {
        &jvm::JVM_TEMPLATES
    }

    fn context_fields(&self, descriptor: &ProjectDescriptor, files: &ProjectFiles) -> ContextFields {
        jvm::context_fields(descriptor, files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::sync::Arc;

    fn project(setup: impl FnOnce(&MockFileSystem)) -> ProjectFiles {
        let fs = MockFileSystem::new();
        setup(&fs);
        ProjectFiles::new(Arc::new(fs), "/mock")
    }

    #[test]
    fn test_plain_sources() {
        let files = project(|fs| fs.add_file("src/Main.java", "class Main {}"));
        let descriptor = JavaEcosystem.detect(&files).unwrap();

        assert_eq!(descriptor.language, LanguageId::Java);
        assert_eq!(descriptor.framework, None);
        assert_eq!(descriptor.runtime_version, "17");
        assert_eq!(descriptor.test_framework, "junit5");
        assert_eq!(descriptor.build_tool(), Some(BuildSystemId::None));
        assert_eq!(
            descriptor.details,
            EcosystemDetails::Java {
                build_tool: BuildSystemId::None,
                packaging: "jar".to_string(),
            }
        );
    }

    #[test]
    fn test_defers_to_build_tools() {
        for manifest in ["pom.xml", "build.gradle", "build.gradle.kts"] {
            let files = project(|fs| {
                fs.add_file("src/Main.java", "");
                fs.add_file(manifest, "");
            });
            assert!(JavaEcosystem.detect(&files).is_none(), "{}", manifest);
        }
    }

    #[test]
    fn test_pinned_version() {
        let files = project(|fs| {
            fs.add_file("Main.java", "");
            fs.add_file(".java-version", "11\n");
        });
        assert_eq!(JavaEcosystem.detect(&files).unwrap().runtime_version, "11");
    }

    #[test]
    fn test_no_sources() {
        let files = project(|fs| fs.add_file("README.md", ""));
        assert!(JavaEcosystem.detect(&files).is_none());
    }
}
