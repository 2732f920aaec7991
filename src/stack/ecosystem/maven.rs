//! Maven classifier

use super::jvm::{self, DEFAULT_JAVA_VERSION, DEFAULT_PACKAGING, DEFAULT_TEST_FRAMEWORK};
use super::{ContextFields, Ecosystem, PlatformTemplateMap};
use crate::fs::ProjectFiles;
use crate::stack::descriptor::EcosystemDetails;
use crate::stack::parsers::capture;
use crate::stack::{BuildSystemId, EcosystemId, LanguageId, ProjectDescriptor};
use tracing::debug;

/// POM properties that carry the Java release, in lookup order.
const VERSION_PROPERTIES: &[&str] = &[
    "maven.compiler.release",
    "maven.compiler.source",
    "maven.compiler.target",
    "java.version",
];

pub struct MavenEcosystem;

impl Ecosystem for MavenEcosystem {
    fn id(&self) -> EcosystemId {
        EcosystemId::Maven
    }

    fn language(&self) -> LanguageId {
        LanguageId::Java
    }

    fn detect(&self, files: &ProjectFiles) -> Option<ProjectDescriptor> {
        if !files.file_exists("pom.xml") {
            return None;
        }

        let pom = files.read_file("pom.xml");
        let lowered = pom.to_lowercase();

        let descriptor = ProjectDescriptor::new(
            LanguageId::Java,
            detect_version(files, &pom),
            detect_test_framework(&lowered),
            EcosystemDetails::Maven {
                build_tool: BuildSystemId::Maven,
                is_multi_module: pom.contains("<modules>") && pom.contains("<module>"),
                packaging: capture(&pom, r"<packaging>\s*(\w+)\s*</packaging>")
                    .unwrap_or_else(|| DEFAULT_PACKAGING.to_string()),
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

fn detect_version(files: &ProjectFiles, pom: &str) -> String {
    let version = jvm::pinned_java_version(files)
        .or_else(|| property_version(pom))
        .or_else(|| capture(pom, r"<maven\.compiler\.source>\s*(\d+)"))
        .or_else(|| capture(pom, r"<java\.version>\s*(\d+)"));

    match version {
        Some(version) => {
            debug!(%version, "java version from maven project");
            version
        }
        None => {
            debug!(default = DEFAULT_JAVA_VERSION, "no java version declared in pom.xml");
            DEFAULT_JAVA_VERSION.to_string()
        }
    }
}

/// Looks the version properties up in the top-level `<properties>` block,
/// ignoring the POM namespace.
fn property_version(pom: &str) -> Option<String> {
    let document = match roxmltree::Document::parse(pom) {
        Ok(document) => document,
        Err(e) => {
            debug!(error = %e, "pom.xml is not well-formed XML");
            return None;
        }
    };

    let properties = document
        .root_element()
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == "properties")?;

    VERSION_PROPERTIES.iter().find_map(|property| {
        properties
            .children()
            .find(|node| node.is_element() && node.tag_name().name() == *property)
            .and_then(|node| node.text())
            .and_then(jvm::java_major)
    })
}

fn detect_framework(pom: &str) -> Option<&'static str> {
    let framework = if pom.contains("spring-boot-starter") {
        Some("spring-boot")
    } else if pom.contains("quarkus") {
        Some("quarkus")
    } else if pom.contains("micronaut") {
        Some("micronaut")
    } else if pom.contains("jakarta.ee") || pom.contains("javax.ee") {
        Some("jakarta-ee")
    } else {
        None
    };
    debug!(framework = ?framework, "maven framework");
    framework
}

fn detect_test_framework(pom: &str) -> &'static str {
    if pom.contains("junit-jupiter") || pom.contains("junit5") {
        "junit5"
    } else if pom.contains("junit") {
        "junit4"
    } else if pom.contains("testng") {
        "testng"
    } else {
        DEFAULT_TEST_FRAMEWORK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::sync::Arc;

    const SPRING_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>orders</artifactId>
  <packaging>war</packaging>
  <properties>
    <java.version>21</java.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-web</artifactId>
    </dependency>
    <dependency>
      <groupId>org.junit.jupiter</groupId>
      <artifactId>junit-jupiter</artifactId>
    </dependency>
  </dependencies>
</project>"#;

    fn project(setup: impl FnOnce(&MockFileSystem)) -> ProjectFiles {
        let fs = MockFileSystem::new();
        setup(&fs);
        ProjectFiles::new(Arc::new(fs), "/mock")
    }

    #[test]
    fn test_gate_requires_pom() {
        let files = project(|fs| fs.add_file("src/main/java/App.java", ""));
        assert!(MavenEcosystem.detect(&files).is_none());
    }

    #[test]
    fn test_minimal_pom_defaults() {
        let files = project(|fs| fs.add_file("pom.xml", ""));
        let descriptor = MavenEcosystem.detect(&files).unwrap();

        assert_eq!(descriptor.language, LanguageId::Java);
        assert_eq!(descriptor.build_tool(), Some(BuildSystemId::Maven));
        assert_eq!(descriptor.framework, None);
        assert_eq!(descriptor.runtime_version, "17");
        assert_eq!(descriptor.test_framework, "junit5");
        assert_eq!(
            descriptor.details,
            EcosystemDetails::Maven {
                build_tool: BuildSystemId::Maven,
                is_multi_module: false,
                packaging: "jar".to_string(),
            }
        );
    }

    #[test]
    fn test_spring_boot_project() {
        let files = project(|fs| fs.add_file("pom.xml", SPRING_POM));
        let descriptor = MavenEcosystem.detect(&files).unwrap();

        assert_eq!(descriptor.framework.as_deref(), Some("spring-boot"));
        assert_eq!(descriptor.runtime_version, "21");
        assert_eq!(descriptor.test_framework, "junit5");
        match descriptor.details {
            EcosystemDetails::Maven { packaging, .. } => assert_eq!(packaging, "war"),
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_property_lookup_order() {
        let pom = r#"<project>
  <properties>
    <java.version>11</java.version>
    <maven.compiler.source>1.8</maven.compiler.source>
  </properties>
</project>"#;
        assert_eq!(property_version(pom).as_deref(), Some("8"));
    }

    #[test]
    fn test_java_version_file_wins() {
        let files = project(|fs| {
            fs.add_file("pom.xml", SPRING_POM);
            fs.add_file(".java-version", "17.0.9\n");
        });
        assert_eq!(MavenEcosystem.detect(&files).unwrap().runtime_version, "17");
    }

    #[test]
    fn test_malformed_pom_falls_back_to_regex() {
        let files = project(|fs| {
            fs.add_file("pom.xml", "<project><maven.compiler.source>11</maven.compiler.source>");
        });
        assert_eq!(MavenEcosystem.detect(&files).unwrap().runtime_version, "11");
    }

    #[test]
    fn test_multi_module() {
        let files = project(|fs| {
            fs.add_file(
                "pom.xml",
                "<project><packaging>pom</packaging><modules><module>api</module></modules></project>",
            );
        });
        let descriptor = MavenEcosystem.detect(&files).unwrap();
        assert_eq!(
            descriptor.details,
            EcosystemDetails::Maven {
                build_tool: BuildSystemId::Maven,
                is_multi_module: true,
                packaging: "pom".to_string(),
            }
        );
    }

    #[test]
    fn test_test_framework_chain() {
        assert_eq!(detect_test_framework("<artifactid>junit</artifactid>"), "junit4");
        assert_eq!(detect_test_framework("<artifactid>testng</artifactid>"), "testng");
        assert_eq!(detect_test_framework(""), "junit5");
    }

    #[test]
    fn test_framework_chain() {
        assert_eq!(detect_framework("io.quarkus"), Some("quarkus"));
        assert_eq!(detect_framework("jakarta.ee"), Some("jakarta-ee"));
        assert_eq!(detect_framework("commons-lang3"), None);
    }
}
