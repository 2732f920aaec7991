use super::context::GenerationContext;
use super::templates::TemplateRenderer;
use crate::error::PipeforgeError;
use crate::fs::{resolve_path, ProjectFiles};
use crate::stack::{Ecosystem, EcosystemId, PlatformId, PlatformTemplate, ProjectDescriptor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Platform generated when the caller asks for none.
pub const DEFAULT_PLATFORM: PlatformId = PlatformId::Jenkins;

/// Outcome of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub ecosystem: EcosystemId,
    pub context: GenerationContext,
    /// Absolute path of every artifact written, by platform.
    pub generated_files: BTreeMap<PlatformId, PathBuf>,
    /// Requested or extra artifacts that were not written, with the reason.
    pub skipped: Vec<SkippedArtifact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedArtifact {
    pub platform: String,
    pub reason: String,
}

/// Renders an ecosystem's template family for the requested platforms.
pub struct PlatformGenerator {
    renderer: Arc<dyn TemplateRenderer>,
}

impl PlatformGenerator {
    pub fn new(renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }

    /// Generates into `output_dir`, probing the project on disk.
    ///
    /// The project root is the descriptor's attached path, or `output_dir`
    /// when none was attached.
    pub fn generate(
        &self,
        ecosystem: &dyn Ecosystem,
        descriptor: &ProjectDescriptor,
        output_dir: &Path,
        platforms: &[String],
    ) -> Result<GenerationResult, PipeforgeError> {
        let root = descriptor
            .project_path
            .clone()
            .unwrap_or_else(|| resolve_path(output_dir));
        self.generate_with_files(
            ecosystem,
            descriptor,
            &ProjectFiles::on_disk(root),
            output_dir,
            platforms,
        )
    }

    /// Generates with explicit project readers.
    ///
    /// Only failing to create `output_dir` is an error. Each artifact that
    /// cannot be rendered or written is logged, recorded in `skipped`, and
    /// the remaining platforms are still generated.
    pub fn generate_with_files(
        &self,
        ecosystem: &dyn Ecosystem,
        descriptor: &ProjectDescriptor,
        files: &ProjectFiles,
        output_dir: &Path,
        platforms: &[String],
    ) -> Result<GenerationResult, PipeforgeError> {
        let output_dir =
            std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
        std::fs::create_dir_all(&output_dir).map_err(|source| PipeforgeError::Io {
            path: output_dir.clone(),
            source,
        })?;

        let context = GenerationContext::build(ecosystem, descriptor, files);
        let templates = ecosystem.templates();
        info!(
            project = context.project_name(),
            ecosystem = %ecosystem.id(),
            family = templates.family(),
            "Generating pipeline files"
        );

        let mut generated_files = BTreeMap::new();
        let mut skipped = Vec::new();
        let mut docker_requested = false;

        for name in requested_platforms(platforms) {
            let entry = PlatformId::from_name(&name).and_then(|platform| templates.get(platform));
            let Some(entry) = entry else {
                warn!(platform = %name, "Skipping unknown platform");
                skipped.push(SkippedArtifact {
                    platform: name,
                    reason: "unknown platform".to_string(),
                });
                continue;
            };
            docker_requested |= entry.platform == PlatformId::Docker;
            self.emit(entry, &context, &output_dir, &mut generated_files, &mut skipped);
        }

        if !docker_requested {
            match templates.get(PlatformId::Docker) {
                Some(entry) => {
                    self.emit(entry, &context, &output_dir, &mut generated_files, &mut skipped)
                }
                None => debug!("template family has no container build file"),
            }
        }

        Ok(GenerationResult {
            ecosystem: ecosystem.id(),
            context,
            generated_files,
            skipped,
        })
    }

    /// Renders and writes one artifact, recording the outcome.
    fn emit(
        &self,
        entry: &PlatformTemplate,
        context: &GenerationContext,
        output_dir: &Path,
        generated_files: &mut BTreeMap<PlatformId, PathBuf>,
        skipped: &mut Vec<SkippedArtifact>,
    ) {
        match self.render_to_file(entry, context, output_dir) {
            Ok(path) => {
                info!(platform = %entry.platform, path = %path.display(), "Generated");
                generated_files.insert(entry.platform, path);
            }
            Err(e) => {
                warn!(platform = %entry.platform, error = %e, "Failed to generate artifact");
                skipped.push(SkippedArtifact {
                    platform: entry.platform.as_str().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn render_to_file(
        &self,
        entry: &PlatformTemplate,
        context: &GenerationContext,
        output_dir: &Path,
    ) -> Result<PathBuf, PipeforgeError> {
        let content = self.renderer.render(entry.template_id, context)?;
        let path = output_dir.join(entry.output_path);
        let write_error = |source| PipeforgeError::FileWrite {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(&path, content).map_err(write_error)?;
        Ok(path)
    }
}

/// Normalized platform names: trimmed, lowercased, de-duplicated in request
/// order, defaulting to Jenkins.
fn requested_platforms(platforms: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in platforms {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    if names.is_empty() {
        names.push(DEFAULT_PLATFORM.as_str().to_string());
    }
    names
}
