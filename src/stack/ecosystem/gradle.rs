//! Gradle classifier (Groovy and Kotlin DSL)

use super::jvm::{self, DEFAULT_JAVA_VERSION, DEFAULT_TEST_FRAMEWORK};
use super::{ContextFields, Ecosystem, PlatformTemplateMap};
use crate::fs::ProjectFiles;
use crate::stack::descriptor::EcosystemDetails;
use crate::stack::parsers::capture;
use crate::stack::{BuildSystemId, EcosystemId, LanguageId, ProjectDescriptor};
use tracing::debug;

const WAR_MARKERS: &[&str] = &[
    "id 'war'",
    "id \"war\"",
    "id(\"war\")",
    "apply plugin: 'war'",
    "apply plugin: \"war\"",
    "bootWar",
];

pub struct GradleEcosystem;

impl Ecosystem for GradleEcosystem {
    fn id(&self) -> EcosystemId {
        EcosystemId::Gradle
    }

    fn language(&self) -> LanguageId {
        LanguageId::Java
    }

    fn detect(&self, files: &ProjectFiles) -> Option<ProjectDescriptor> {
        let uses_kotlin_dsl = files.file_exists("build.gradle.kts");
        if !files.file_exists("build.gradle") && !uses_kotlin_dsl {
            return None;
        }

        let script = build_script(files);
        let lowered = script.to_lowercase();

        let descriptor = ProjectDescriptor::new(
            LanguageId::Java,
            detect_version(files, &script),
            detect_test_framework(&lowered),
            EcosystemDetails::Gradle {
                build_tool: BuildSystemId::Gradle,
                uses_kotlin_dsl,
                is_multi_project: files.file_exists("settings.gradle")
                    || files.file_exists("settings.gradle.kts"),
                packaging: detect_packaging(&script).to_string(),
            },
        )
        .with_framework(detect_framework(&lowered));

        Some(descriptor)
    }

    fn templates(&self) -> &'static PlatformTemplateMap {
        &jvm::JVM_TEMPLATES
    }

    fn context_fields(&self, descriptor: &ProjectDescriptor, files: &ProjectFiles) -> ContextFields {
        jvm::context_fields(descriptor, files)
    }
}

/// Content of `build.gradle`, or of `build.gradle.kts` when the Groovy script
/// is absent or empty.
fn build_script(files: &ProjectFiles) -> String {
    let groovy = files.read_file("build.gradle");
    if groovy.is_empty() {
        files.read_file("build.gradle.kts")
    } else {
        groovy
    }
}

fn detect_version(files: &ProjectFiles, script: &str) -> String {
    let version = jvm::pinned_java_version(files)
        .or_else(|| {
            capture(script, r#"sourceCompatibility\s*=\s*["']?(\d+(?:\.\d+)?)"#)
                .and_then(|v| jvm::java_major(&v))
        })
        .or_else(|| capture(script, r"JavaVersion\.VERSION_(?:1_)?(\d+)"))
        .or_else(|| capture(script, r"JavaLanguageVersion\.of\((\d+)\)"));

    match version {
        Some(version) => {
            debug!(%version, "java version from gradle build");
            version
        }
        None => {
            debug!(default = DEFAULT_JAVA_VERSION, "no java version in gradle build");
            DEFAULT_JAVA_VERSION.to_string()
        }
    }
}

fn detect_framework(script: &str) -> Option<&'static str> {
    let framework = if script.contains("spring-boot") || script.contains("org.springframework.boot") {
        Some("spring-boot")
    } else if script.contains("quarkus") {
        Some("quarkus")
    } else if script.contains("micronaut") {
        Some("micronaut")
    } else {
        None
    };
    debug!(framework = ?framework, "gradle framework");
    framework
}

fn detect_test_framework(script: &str) -> &'static str {
    if script.contains("junit-jupiter") || script.contains("'junit5'") {
        "junit5"
    } else if script.contains("junit") {
        "junit4"
    } else if script.contains("testng") {
        "testng"
    } else if script.contains("spock") {
        "spock"
    } else {
        DEFAULT_TEST_FRAMEWORK
    }
}

fn detect_packaging(script: &str) -> &'static str {
    if WAR_MARKERS.iter().any(|marker| script.contains(marker)) {
        "war"
    } else {
        jvm::DEFAULT_PACKAGING
    }
}
