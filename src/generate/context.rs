//! Template-facing view of a descriptor.

use crate::fs::ProjectFiles;
use crate::stack::{EcosystemDetails, EcosystemId, Ecosystem, ProjectDescriptor};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Name used when the project path has no final component, e.g. `/`.
pub const PLACEHOLDER_PROJECT_NAME: &str = "my-app";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Flat key/value map handed to every template of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GenerationContext {
    fields: Map<String, Value>,
}

impl GenerationContext {
    /// Builds the context for a classified project.
    ///
    /// Base keys come first; ecosystem keys are merged over them. Only the
    /// ecosystem's module and packaging probes read the tree again.
    pub fn build(
        ecosystem: &dyn Ecosystem,
        descriptor: &ProjectDescriptor,
        files: &ProjectFiles,
    ) -> Self {
        let id = ecosystem.id();
        let version = descriptor.runtime_version.as_str();

        let mut fields = Map::new();
        fields.insert("project_name".into(), Value::from(project_name(files.root())));
        fields.insert(
            "generation_date".into(),
            Value::from(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
        );
        fields.insert("ecosystem".into(), Value::from(id.as_str()));
        fields.insert("language".into(), Value::from(descriptor.language.as_str()));
        fields.insert(
            "framework".into(),
            descriptor
                .framework
                .as_deref()
                .map(Value::from)
                .unwrap_or(Value::Null),
        );
        fields.insert("runtime_version".into(), Value::from(version));
        fields.insert(
            "test_framework".into(),
            Value::from(descriptor.test_framework.as_str()),
        );
        fields.insert("docker_base_image".into(), Value::from(base_image(id, version)));
        fields.insert(
            "docker_runtime_image".into(),
            Value::from(runtime_image(id, version, is_web_app(descriptor))),
        );
        fields.insert(
            "docker_port".into(),
            Value::from(default_port(id, descriptor.framework.as_deref())),
        );
        fields.insert("matrix".into(), json!({ "versions": [version] }));
        fields.insert("enable_linting".into(), Value::Bool(true));
        fields.insert("enable_security_scan".into(), Value::Bool(true));
        fields.insert("enable_docker".into(), Value::Bool(true));

        fields.extend(ecosystem.context_fields(descriptor, files));
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn project_name(&self) -> &str {
        self.get("project_name")
            .and_then(Value::as_str)
            .unwrap_or(PLACEHOLDER_PROJECT_NAME)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for GenerationContext {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Directory base name, or the placeholder when there is none.
pub fn project_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(PLACEHOLDER_PROJECT_NAME)
        .to_string()
}

/// Port the container exposes.
///
/// Python serves flask on 5000 and everything else (django, fastapi) on 8000;
/// Node serves on 3000;
/// every JVM and .NET project listens on 8080.
pub fn default_port(ecosystem: EcosystemId, framework: Option<&str>) -> u16 {
    match ecosystem {
        EcosystemId::Python => match framework {
            Some("flask") => 5000,
            _ => 8000,
        },
        EcosystemId::Node => 3000,
        EcosystemId::Maven | EcosystemId::Gradle | EcosystemId::Java => 8080,
        EcosystemId::DotNet => 8080,
    }
}

/// Image the build stage runs in.
pub fn base_image(ecosystem: EcosystemId, version: &str) -> String {
    match ecosystem {
        EcosystemId::Python => format!("python:{}-slim", version),
        EcosystemId::Node => format!("node:{}-alpine", version),
        EcosystemId::Maven | EcosystemId::Gradle | EcosystemId::Java => {
            format!("eclipse-temurin:{}-jdk-alpine", version)
        }
        EcosystemId::DotNet => format!("mcr.microsoft.com/dotnet/sdk:{}", version),
    }
}

/// Image the final stage runs in. Interpreted runtimes reuse the build image.
pub fn runtime_image(ecosystem: EcosystemId, version: &str, is_web_app: bool) -> String {
    match ecosystem {
        EcosystemId::Python | EcosystemId::Node => base_image(ecosystem, version),
        EcosystemId::Maven | EcosystemId::Gradle | EcosystemId::Java => {
            format!("eclipse-temurin:{}-jre-alpine", version)
        }
        EcosystemId::DotNet if is_web_app => {
            format!("mcr.microsoft.com/dotnet/aspnet:{}", version)
        }
        EcosystemId::DotNet => format!("mcr.microsoft.com/dotnet/runtime:{}", version),
    }
}

fn is_web_app(descriptor: &ProjectDescriptor) -> bool {
    matches!(
        descriptor.details,
        EcosystemDetails::DotNet {
            is_web_app: true,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::stack::EcosystemRegistry;
    use std::sync::Arc;
    use yare::parameterized;

    fn context_for(root: &str, setup: impl FnOnce(&MockFileSystem)) -> GenerationContext {
        let fs = MockFileSystem::with_root(root);
        setup(&fs);
        let files = ProjectFiles::new(Arc::new(fs), root);
        let registry = EcosystemRegistry::with_defaults();
        let (id, descriptor) = registry.classify_files(&files, None).unwrap();
        GenerationContext::build(registry.get(id).unwrap(), &descriptor, &files)
    }

    #[parameterized(
        flask = { Some("flask"), 5000 },
        django = { Some("django"), 8000 },
        fastapi = { Some("fastapi"), 8000 },
        generic = { None, 8000 },
        unknown = { Some("bottle"), 8000 },
    )]
    fn test_python_ports(framework: Option<&str>, expected: u16) {
        assert_eq!(default_port(EcosystemId::Python, framework), expected);
    }

    #[test]
    fn test_ports_for_other_ecosystems() {
        assert_eq!(default_port(EcosystemId::Node, Some("nextjs")), 3000);
        assert_eq!(default_port(EcosystemId::Node, None), 3000);
        assert_eq!(default_port(EcosystemId::Gradle, Some("spring-boot")), 8080);
        assert_eq!(default_port(EcosystemId::DotNet, None), 8080);
    }

    #[test]
    fn test_images() {
        assert_eq!(base_image(EcosystemId::Python, "3.12"), "python:3.12-slim");
        assert_eq!(runtime_image(EcosystemId::Node, "20", false), "node:20-alpine");
        assert_eq!(
            base_image(EcosystemId::Maven, "21"),
            "eclipse-temurin:21-jdk-alpine"
        );
        assert_eq!(
            runtime_image(EcosystemId::Java, "17", false),
            "eclipse-temurin:17-jre-alpine"
        );
        assert_eq!(
            runtime_image(EcosystemId::DotNet, "8.0", true),
            "mcr.microsoft.com/dotnet/aspnet:8.0"
        );
        assert_eq!(
            runtime_image(EcosystemId::DotNet, "8.0", false),
            "mcr.microsoft.com/dotnet/runtime:8.0"
        );
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name(Path::new("/srv/shop")), "shop");
        assert_eq!(project_name(Path::new("/")), PLACEHOLDER_PROJECT_NAME);
    }

    #[test]
    fn test_python_context() {
        let context = context_for("/srv/shop", |fs| {
            fs.add_file("requirements.txt", "flask==2.3.0\n");
            fs.add_file(".python-version", "3.12.1");
        });

        assert_eq!(context.project_name(), "shop");
        assert_eq!(context.fields()["ecosystem"], "python");
        assert_eq!(context.fields()["framework"], "flask");
        assert_eq!(context.fields()["docker_port"], 5000);
        assert_eq!(context.fields()["docker_base_image"], "python:3.12-slim");
        assert_eq!(context.fields()["python_version"], "3.12");
        assert_eq!(context.fields()["matrix"], json!({ "versions": ["3.12"] }));
        assert!(context.fields()["generation_date"].is_string());
    }

    #[test]
    fn test_generic_framework_is_null() {
        let context = context_for("/srv/tool", |fs| fs.add_file("Tool.java", ""));
        assert_eq!(context.get("framework"), Some(&Value::Null));
        assert_eq!(context.fields()["ecosystem"], "java");
        assert_eq!(context.fields()["build_tool"], "none");
        assert_eq!(context.fields()["is_multi_module"], false);
    }

    #[test]
    fn test_dotnet_web_runtime_image() {
        let context = context_for("/srv/api", |fs| {
            fs.add_file(
                "Api.csproj",
                r#"<Project Sdk="Microsoft.NET.Sdk.Web"><TargetFramework>net8.0</TargetFramework></Project>"#,
            );
        });
        assert_eq!(
            context.fields()["docker_runtime_image"],
            "mcr.microsoft.com/dotnet/aspnet:8.0"
        );
        assert_eq!(context.fields()["is_web_app"], true);
        assert_eq!(context.fields()["dotnet_version"], "8.0");
    }

    #[test]
    fn test_context_serializes_flat() {
        let context = context_for("/srv/web", |fs| fs.add_file("package.json", "{}"));
        let value = serde_json::to_value(&context).unwrap();
        assert_eq!(value["node_version"], "20");
        assert_eq!(value["docker_port"], 3000);
    }
}
