//! Python classifier (pip, Poetry, Pipenv)

use super::{platform_templates, ContextFields, Ecosystem, PlatformTemplateMap};
use crate::fs::ProjectFiles;
use crate::stack::descriptor::EcosystemDetails;
use crate::stack::parsers::{
    capture, dependencies_from_file, extract_version, normalize_version, pep508_name,
};
use crate::stack::{BuildSystemId, EcosystemId, LanguageId, ProjectDescriptor};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

pub const DEFAULT_PYTHON_VERSION: &str = "3.11";
pub const DEFAULT_APP_MODULE: &str = "app";

const MARKER_FILES: &[&str] = &[
    "requirements.txt",
    "requirements-dev.txt",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "Pipfile",
    "poetry.lock",
    ".python-version",
    "runtime.txt",
];

/// Manifests of other ecosystems; a stray script next to one of these does
/// not make the project a Python project.
const FOREIGN_MANIFESTS: &[&str] = &["package.json", "pom.xml", "build.gradle", "build.gradle.kts"];
const FOREIGN_EXTENSIONS: &[&str] = &["csproj", "sln"];

const FRAMEWORKS: &[&str] = &["fastapi", "flask", "django"];

const APP_MODULE_CANDIDATES: &[&str] = &["app", "src", "cli"];
const NON_SOURCE_DIRS: &[&str] = &[
    "tests",
    "test",
    "docs",
    "scripts",
    "venv",
    ".venv",
    "templates",
    "node_modules",
];

static TEMPLATES: PlatformTemplateMap = platform_templates!("python");

pub struct PythonEcosystem;

impl Ecosystem for PythonEcosystem {
    fn id(&self) -> EcosystemId {
        EcosystemId::Python
    }

    fn language(&self) -> LanguageId {
        LanguageId::Python
    }

    fn detect(&self, files: &ProjectFiles) -> Option<ProjectDescriptor> {
        if !self.gate(files) {
            return None;
        }

        let dependencies = all_dependencies(files);
        let descriptor = ProjectDescriptor::new(
            LanguageId::Python,
            detect_version(files),
            detect_test_framework(files, &dependencies),
            EcosystemDetails::Python {
                package_manager: detect_package_manager(files),
            },
        )
        .with_framework(detect_framework(&dependencies));

        Some(descriptor)
    }

    fn templates(&self) -> &'static PlatformTemplateMap {
        &TEMPLATES
    }

    fn context_fields(&self, descriptor: &ProjectDescriptor, files: &ProjectFiles) -> ContextFields {
        let mut fields = ContextFields::new();
        let package_manager = descriptor.package_manager().unwrap_or(BuildSystemId::Pip);

        fields.insert(
            "python_version".into(),
            Value::from(descriptor.runtime_version.clone()),
        );
        fields.insert("package_manager".into(), Value::from(package_manager.as_str()));
        fields.insert("app_module".into(), Value::from(app_module(files)));
        fields.insert(
            "has_requirements_txt".into(),
            Value::from(files.file_exists("requirements.txt")),
        );
        fields.insert(
            "has_requirements_dev".into(),
            Value::from(files.file_exists("requirements-dev.txt")),
        );
        fields.insert("build_package".into(), Value::from(is_library(files)));
        fields
    }
}

impl PythonEcosystem {
    fn gate(&self, files: &ProjectFiles) -> bool {
        if let Some(marker) = MARKER_FILES.iter().find(|m| files.file_exists(m)) {
            debug!(marker, "python marker file found");
            return true;
        }

        if !files.has_file_with_extension("py") {
            return false;
        }

        let foreign = FOREIGN_MANIFESTS.iter().any(|m| files.file_exists(m))
            || FOREIGN_EXTENSIONS
                .iter()
                .any(|ext| files.has_file_with_extension(ext));
        if foreign {
            debug!("python sources found next to another ecosystem's manifest, deferring");
        }
        !foreign
    }
}

fn detect_package_manager(files: &ProjectFiles) -> BuildSystemId {
    let package_manager = if files.file_exists("poetry.lock") {
        BuildSystemId::Poetry
    } else if files.file_exists("Pipfile") {
        BuildSystemId::Pipenv
    } else if files.file_exists("requirements.txt") {
        BuildSystemId::Pip
    } else if files.read_file("pyproject.toml").contains("[tool.poetry]") {
        BuildSystemId::Poetry
    } else {
        BuildSystemId::Pip
    };
    debug!(%package_manager, "python package manager");
    package_manager
}

fn detect_version(files: &ProjectFiles) -> String {
    const OPERATORS: &str = r#"["'][\^~>=<!\s]*"#;

    let version = capture(&files.read_file(".python-version"), r"(\d+(?:\.\d+)*)")
        .map(|v| normalize_version(&v))
        .or_else(|| {
            extract_version(
                &files.read_file("runtime.txt"),
                r"python-(\d+\.\d+(?:\.\d+)?)",
            )
        })
        .or_else(|| {
            let pyproject = files.read_file("pyproject.toml");
            extract_version(
                &pyproject,
                &format!(r"(?m)^\s*python\s*=\s*{}(\d+(?:\.\d+)*)", OPERATORS),
            )
            .or_else(|| {
                extract_version(
                    &pyproject,
                    &format!(r"requires-python\s*=\s*{}(\d+(?:\.\d+)*)", OPERATORS),
                )
            })
        })
        .or_else(|| {
            extract_version(
                &files.read_file("setup.py"),
                &format!(r"python_requires\s*=\s*{}(\d+(?:\.\d+)*)", OPERATORS),
            )
        })
        .or_else(|| {
            extract_version(
                &files.read_file("Pipfile"),
                r#"python_version\s*=\s*["'](\d+(?:\.\d+)*)"#,
            )
        });

    match version {
        Some(version) => {
            debug!(%version, "python version from project files");
            version
        }
        None => {
            debug!(default = DEFAULT_PYTHON_VERSION, "no python version pinned");
            DEFAULT_PYTHON_VERSION.to_string()
        }
    }
}

fn detect_framework(dependencies: &BTreeSet<String>) -> Option<&'static str> {
    let framework = FRAMEWORKS
        .iter()
        .copied()
        .find(|name| dependencies.contains(*name));
    debug!(framework = ?framework, "python framework");
    framework
}

fn detect_test_framework(files: &ProjectFiles, dependencies: &BTreeSet<String>) -> String {
    let setup_cfg = files.read_file("setup.cfg");
    let signal = if files.file_exists("pytest.ini") {
        Some("pytest.ini")
    } else if files.read_file("pyproject.toml").contains("[tool.pytest") {
        Some("pyproject.toml")
    } else if setup_cfg.contains("[tool:pytest]") || setup_cfg.contains("[pytest]") {
        Some("setup.cfg")
    } else if dependencies.contains("pytest") {
        Some("dependencies")
    } else if has_pytest_imports(files) {
        Some("test imports")
    } else {
        None
    };

    match signal {
        Some(source) => debug!(source, "pytest detected"),
        None => debug!("no test framework signal, defaulting to pytest"),
    }
    "pytest".to_string()
}

/// Declared dependency names across requirement files and `pyproject.toml`.
pub(crate) fn all_dependencies(files: &ProjectFiles) -> BTreeSet<String> {
    let mut dependencies = dependencies_from_file(files, "requirements.txt");
    dependencies.extend(dependencies_from_file(files, "requirements-dev.txt"));

    let pyproject = files.read_file("pyproject.toml");
    if !pyproject.is_empty() {
        dependencies.extend(pyproject_dependencies(&pyproject));
    }
    dependencies
}

/// Dependency names declared in `pyproject.toml`.
///
/// Reads PEP 621 and Poetry tables; content that is not valid TOML falls back
/// to every quoted identifier-like token.
fn pyproject_dependencies(content: &str) -> BTreeSet<String> {
    let document: toml::Value = match toml::from_str(content) {
        Ok(document) => document,
        Err(e) => {
            debug!(error = %e, "pyproject.toml is not valid TOML, scanning quoted tokens");
            return quoted_tokens(content);
        }
    };

    let mut names = BTreeSet::new();

    if let Some(project) = document.get("project") {
        let requirements = project
            .get("dependencies")
            .and_then(|d| d.as_array())
            .into_iter()
            .flatten()
            .chain(
                project
                    .get("optional-dependencies")
                    .and_then(|o| o.as_table())
                    .into_iter()
                    .flat_map(|table| table.values())
                    .filter_map(|group| group.as_array())
                    .flatten(),
            );
        names.extend(
            requirements
                .filter_map(|r| r.as_str())
                .filter_map(pep508_name),
        );
    }

    if let Some(poetry) = document.get("tool").and_then(|t| t.get("poetry")) {
        let groups = poetry
            .get("group")
            .and_then(|g| g.as_table())
            .into_iter()
            .flat_map(|table| table.values())
            .filter_map(|group| group.get("dependencies"));
        let tables = [poetry.get("dependencies"), poetry.get("dev-dependencies")]
            .into_iter()
            .flatten()
            .chain(groups)
            .filter_map(|t| t.as_table());
        for table in tables {
            names.extend(
                table
                    .keys()
                    .filter(|name| name.as_str() != "python")
                    .map(|name| name.to_lowercase()),
            );
        }
    }

    names
}

fn quoted_tokens(content: &str) -> BTreeSet<String> {
    let Ok(re) = Regex::new(r#"["']([a-z0-9\-_]+)["']"#) else {
        return BTreeSet::new();
    };
    let lowered = content.to_lowercase();
    re.captures_iter(&lowered)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn has_pytest_imports(files: &ProjectFiles) -> bool {
    let test_files = files.files_matching(|path| {
        let in_test_dir = path
            .components()
            .next()
            .and_then(|c| c.as_os_str().to_str())
            .map(|first| first == "tests" || first == "test")
            .unwrap_or(false);
        let is_test_module = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|name| name.starts_with("test_") && name.ends_with(".py"))
            .unwrap_or(false);
        in_test_dir && is_test_module
    });

    test_files.iter().any(|path| {
        let content = files.read_file(path);
        content.contains("import pytest") || content.contains("from pytest")
    })
}

/// Primary package directory: a preferred name holding `__init__.py`, then the
/// first source-looking subdirectory that does, else `app`.
fn app_module(files: &ProjectFiles) -> String {
    let project_name = files
        .root()
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);

    let is_package = |dir: &str| files.is_dir(dir) && files.file_exists(&format!("{}/__init__.py", dir));

    let preferred = APP_MODULE_CANDIDATES
        .iter()
        .map(|c| c.to_string())
        .chain(project_name)
        .find(|candidate| is_package(candidate));
    if let Some(module) = preferred {
        return module;
    }

    files
        .subdirectories("")
        .into_iter()
        .filter(|dir| !NON_SOURCE_DIRS.contains(&dir.as_str()))
        .find(|dir| is_package(dir))
        .unwrap_or_else(|| DEFAULT_APP_MODULE.to_string())
}

/// A project with a packaging descriptor or a `[build-system]` table builds a
/// distributable package.
fn is_library(files: &ProjectFiles) -> bool {
    files.file_exists("setup.py") || files.read_file("pyproject.toml").contains("[build-system]")
}
