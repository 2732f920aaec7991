//! Signals and context shared by the Maven, Gradle and plain-Java classifiers.

use super::{platform_templates, ContextFields, PlatformTemplateMap};
use crate::fs::ProjectFiles;
use crate::stack::descriptor::EcosystemDetails;
use crate::stack::parsers::capture;
use crate::stack::{BuildSystemId, ProjectDescriptor};
use serde_json::Value;

pub const DEFAULT_JAVA_VERSION: &str = "17";
pub const DEFAULT_TEST_FRAMEWORK: &str = "junit5";
pub const DEFAULT_PACKAGING: &str = "jar";

/// One template family renders every JVM build flavour.
pub static JVM_TEMPLATES: PlatformTemplateMap = platform_templates!("jvm");

/// Manifests that hand a project to a build-tool classifier.
pub const BUILD_MANIFESTS: &[&str] = &["pom.xml", "build.gradle", "build.gradle.kts"];

/// Java feature release of a version string; legacy `1.x` spellings map to `x`.
pub fn java_major(version: &str) -> Option<String> {
    capture(version.trim(), r"^(?:1\.)?(\d+)")
}

/// Version pinned in `.java-version` (jenv, SDKMAN, asdf).
pub fn pinned_java_version(files: &ProjectFiles) -> Option<String> {
    java_major(&files.read_file(".java-version"))
}

/// Source root the pipelines lint and scan.
pub fn source_dir(files: &ProjectFiles) -> &'static str {
    if files.is_dir("src/main/java") {
        "src/main/java"
    } else if files.is_dir("src") {
        "src"
    } else {
        "."
    }
}

/// Context keys for every JVM descriptor; keys a flavour has no signal for
/// get their neutral value so the shared templates see all of them.
pub fn context_fields(descriptor: &ProjectDescriptor, files: &ProjectFiles) -> ContextFields {
    let (build_tool, packaging, is_multi_module, is_multi_project, uses_kotlin_dsl) =
        match &descriptor.details {
            EcosystemDetails::Maven {
                build_tool,
                is_multi_module,
                packaging,
            } => (*build_tool, packaging.as_str(), *is_multi_module, false, false),
            EcosystemDetails::Gradle {
                build_tool,
                uses_kotlin_dsl,
                is_multi_project,
                packaging,
            } => (
                *build_tool,
                packaging.as_str(),
                false,
                *is_multi_project,
                *uses_kotlin_dsl,
            ),
            EcosystemDetails::Java {
                build_tool,
                packaging,
            } => (*build_tool, packaging.as_str(), false, false, false),
            _ => (BuildSystemId::None, DEFAULT_PACKAGING, false, false, false),
        };

    let mut fields = ContextFields::new();
    fields.insert(
        "java_version".into(),
        Value::from(descriptor.runtime_version.clone()),
    );
    fields.insert("build_tool".into(), Value::from(build_tool.as_str()));
    fields.insert("packaging".into(), Value::from(packaging));
    fields.insert("is_multi_module".into(), Value::from(is_multi_module));
    fields.insert("is_multi_project".into(), Value::from(is_multi_project));
    fields.insert("uses_kotlin_dsl".into(), Value::from(uses_kotlin_dsl));
    fields.insert("source_dir".into(), Value::from(source_dir(files)));
    fields
}
