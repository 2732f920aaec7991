//! .NET classifier (SDK-style `*.csproj` projects and solutions)

use super::{platform_templates, ContextFields, Ecosystem, PlatformTemplateMap};
use crate::fs::ProjectFiles;
use crate::stack::descriptor::EcosystemDetails;
use crate::stack::parsers::{extract_version, normalize_version};
use crate::stack::{EcosystemId, LanguageId, ProjectDescriptor};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_DOTNET_VERSION: &str = "8.0";
pub const DEFAULT_TEST_FRAMEWORK: &str = "xunit";
pub const DEFAULT_PROJECT_TYPE: &str = "console";

const TEST_FRAMEWORKS: &[&str] = &["xunit", "nunit", "mstest"];

static TEMPLATES: PlatformTemplateMap = platform_templates!("dotnet");

pub struct DotNetEcosystem;

impl Ecosystem for DotNetEcosystem {
    fn id(&self) -> EcosystemId {
        EcosystemId::DotNet
    }

    fn language(&self) -> LanguageId {
        LanguageId::DotNet
    }

    fn detect(&self, files: &ProjectFiles) -> Option<ProjectDescriptor> {
        let projects = files.files_with_extension("csproj");
        let has_solution = files.has_file_with_extension("sln");
        if projects.is_empty() && !has_solution {
            return None;
        }

        // Only a solution file: every project-file signal falls back to its default.
        let primary = projects.first().map(|path| files.read_file(path)).unwrap_or_default();
        if let Some(path) = projects.first() {
            debug!(project = %path.display(), "analysing project file");
        }

        let descriptor = ProjectDescriptor::new(
            LanguageId::DotNet,
            detect_version(files, &primary),
            detect_test_framework(files, &projects),
            EcosystemDetails::DotNet {
                project_type: detect_project_type(&primary).to_string(),
                has_solution,
                is_web_app: is_web_app(&primary),
            },
        )
        .with_framework(detect_framework(&primary.to_lowercase()));

        Some(descriptor)
    }

    fn templates(&self) -> &'static PlatformTemplateMap {
        &TEMPLATES
    }

    fn context_fields(&self, descriptor: &ProjectDescriptor, _files: &ProjectFiles) -> ContextFields {
        let (project_type, has_solution, is_web_app) = match &descriptor.details {
            EcosystemDetails::DotNet {
                project_type,
                has_solution,
                is_web_app,
            } => (project_type.as_str(), *has_solution, *is_web_app),
            _ => (DEFAULT_PROJECT_TYPE, false, false),
        };

        let mut fields = ContextFields::new();
        fields.insert(
            "dotnet_version".into(),
            Value::from(descriptor.runtime_version.clone()),
        );
        fields.insert("project_type".into(), Value::from(project_type));
        fields.insert("has_solution".into(), Value::from(has_solution));
        fields.insert("is_web_app".into(), Value::from(is_web_app));
        fields
    }
}

/// SDK version pinned in `global.json`.
fn global_json_version(files: &ProjectFiles) -> Option<String> {
    let content = files.read_file("global.json");
    if content.is_empty() {
        return None;
    }
    let document: Value = serde_json::from_str(&content)
        .map_err(|e| debug!(error = %e, "global.json is not valid JSON"))
        .ok()?;
    document
        .pointer("/sdk/version")
        .and_then(Value::as_str)
        .map(normalize_version)
}

fn detect_version(files: &ProjectFiles, project: &str) -> String {
    let version = global_json_version(files)
        .or_else(|| {
            extract_version(
                project,
                r"<TargetFramework>\s*net(\d+\.\d+)(?:-[\w.]+)?\s*</TargetFramework>",
            )
        })
        .or_else(|| extract_version(project, r"<TargetFrameworks>\s*net(\d+\.\d+)"))
        .or_else(|| extract_version(project, r"<TargetFrameworks?>\s*netcoreapp(\d+\.\d+)"));

    match version {
        Some(version) => {
            debug!(%version, "dotnet version from project files");
            version
        }
        None => {
            debug!(default = DEFAULT_DOTNET_VERSION, "no target framework found");
            DEFAULT_DOTNET_VERSION.to_string()
        }
    }
}

fn detect_framework(project: &str) -> Option<&'static str> {
    let framework = if project.contains("microsoft.aspnetcore.blazor")
        || project.contains("microsoft.aspnetcore.components")
    {
        if project.contains("webassembly") {
            Some("blazor-wasm")
        } else {
            Some("blazor-server")
        }
    } else if project.contains("microsoft.aspnetcore") || project.contains("microsoft.net.sdk.web")
    {
        Some("aspnetcore")
    } else if project.contains("microsoft.entityframeworkcore") {
        Some("efcore")
    } else {
        None
    };
    debug!(framework = ?framework, "dotnet framework");
    framework
}

fn detect_project_type(project: &str) -> &'static str {
    if project.contains("Microsoft.NET.Sdk.Web") {
        "web"
    } else if project.contains("Microsoft.NET.Sdk.Worker") {
        "worker"
    } else if project.contains("<OutputType>Exe</OutputType>") {
        "console"
    } else if project.contains("<OutputType>Library</OutputType>") {
        "library"
    } else {
        DEFAULT_PROJECT_TYPE
    }
}

/// First test framework referenced by any project file, in sorted path order.
fn detect_test_framework(files: &ProjectFiles, projects: &[PathBuf]) -> &'static str {
    projects
        .iter()
        .find_map(|path| {
            let content = files.read_file(path).to_lowercase();
            TEST_FRAMEWORKS
                .iter()
                .copied()
                .find(|framework| content.contains(framework))
        })
        .unwrap_or(DEFAULT_TEST_FRAMEWORK)
}

fn is_web_app(project: &str) -> bool {
    project.contains("Microsoft.NET.Sdk.Web") || project.contains("Microsoft.AspNetCore")
}
