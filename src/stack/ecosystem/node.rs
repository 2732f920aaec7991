//! Node.js classifier (npm, Yarn, pnpm)

use super::{platform_templates, ContextFields, Ecosystem, PlatformTemplateMap};
use crate::fs::ProjectFiles;
use crate::stack::descriptor::EcosystemDetails;
use crate::stack::parsers::{capture, normalize_version};
use crate::stack::{BuildSystemId, EcosystemId, LanguageId, ProjectDescriptor};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

pub const DEFAULT_NODE_VERSION: &str = "20";
pub const DEFAULT_TEST_FRAMEWORK: &str = "jest";

const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

/// Dependency marker and reported framework name, in priority order.
const FRAMEWORKS: &[(&str, &str)] = &[
    ("next", "nextjs"),
    ("@nestjs/core", "nestjs"),
    ("express", "express"),
    ("fastify", "fastify"),
    ("koa", "koa"),
];

/// Config-file prefixes that pin a test runner.
const TEST_CONFIGS: &[(&str, &str)] = &[
    ("jest.config.", "jest"),
    ("vitest.config.", "vitest"),
    (".mocharc", "mocha"),
];

const TEST_DEPENDENCIES: &[&str] = &["jest", "mocha", "vitest"];

static TEMPLATES: PlatformTemplateMap = platform_templates!("node");

pub struct NodeEcosystem;

impl Ecosystem for NodeEcosystem {
    fn id(&self) -> EcosystemId {
        EcosystemId::Node
    }

    fn language(&self) -> LanguageId {
        LanguageId::Node
    }

    fn detect(&self, files: &ProjectFiles) -> Option<ProjectDescriptor> {
        if !files.file_exists("package.json") {
            return None;
        }

        let manifest = package_json(files);
        let dependencies = manifest
            .as_ref()
            .map(all_dependencies)
            .unwrap_or_default();

        let descriptor = ProjectDescriptor::new(
            LanguageId::Node,
            detect_version(files, manifest.as_ref()),
            detect_test_framework(files, &dependencies),
            EcosystemDetails::Node {
                package_manager: detect_package_manager(files),
            },
        )
        .with_framework(detect_framework(&dependencies));

        Some(descriptor)
    }

    fn templates(&self) -> &'static PlatformTemplateMap {
        &TEMPLATES
    }

    fn context_fields(&self, descriptor: &ProjectDescriptor, _files: &ProjectFiles) -> ContextFields {
        let package_manager = descriptor.package_manager().unwrap_or(BuildSystemId::Npm);

        let mut fields = ContextFields::new();
        fields.insert(
            "node_version".into(),
            Value::from(descriptor.runtime_version.clone()),
        );
        fields.insert("package_manager".into(), Value::from(package_manager.as_str()));
        fields
    }
}

/// Parsed `package.json`; invalid JSON reads as absent.
fn package_json(files: &ProjectFiles) -> Option<Value> {
    let content = files.read_file("package.json");
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "package.json is not valid JSON");
            None
        }
    }
}

fn all_dependencies(manifest: &Value) -> BTreeSet<String> {
    DEPENDENCY_SECTIONS
        .iter()
        .filter_map(|section| manifest.get(section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Version spelled in a pin file such as `v20.11.0`; aliases like `lts/*` are ignored.
fn pinned_version(content: &str) -> Option<String> {
    let version = content.trim().trim_start_matches('v');
    version
        .starts_with(|c: char| c.is_ascii_digit())
        .then(|| normalize_version(version))
}

fn detect_version(files: &ProjectFiles, manifest: Option<&Value>) -> String {
    let version = pinned_version(&files.read_file(".nvmrc"))
        .or_else(|| pinned_version(&files.read_file(".node-version")))
        .or_else(|| {
            manifest
                .and_then(|m| m.pointer("/engines/node"))
                .and_then(Value::as_str)
                .and_then(|range| capture(range, r"(\d+)"))
        });

    match version {
        Some(version) => {
            debug!(%version, "node version from project files");
            version
        }
        None => {
            debug!(default = DEFAULT_NODE_VERSION, "no node version pinned");
            DEFAULT_NODE_VERSION.to_string()
        }
    }
}

fn detect_package_manager(files: &ProjectFiles) -> BuildSystemId {
    if files.file_exists("pnpm-lock.yaml") {
        BuildSystemId::Pnpm
    } else if files.file_exists("yarn.lock") {
        BuildSystemId::Yarn
    } else {
        BuildSystemId::Npm
    }
}

fn detect_framework(dependencies: &BTreeSet<String>) -> Option<&'static str> {
    let framework = FRAMEWORKS
        .iter()
        .find(|(marker, _)| dependencies.contains(*marker))
        .map(|(_, name)| *name);
    debug!(framework = ?framework, "node framework");
    framework
}

fn detect_test_framework(files: &ProjectFiles, dependencies: &BTreeSet<String>) -> &'static str {
    let root_files = files.files_matching(|path| path.components().count() == 1);
    let from_config = TEST_CONFIGS.iter().find_map(|(prefix, runner)| {
        root_files
            .iter()
            .filter_map(|path| path.to_str())
            .any(|name| name.starts_with(prefix))
            .then_some(*runner)
    });
    if let Some(runner) = from_config {
        debug!(runner, "test runner from config file");
        return runner;
    }

    TEST_DEPENDENCIES
        .iter()
        .copied()
        .find(|runner| dependencies.contains(*runner))
        .unwrap_or(DEFAULT_TEST_FRAMEWORK)
}
