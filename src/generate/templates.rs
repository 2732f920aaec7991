//! Template rendering.
//!
//! Templates are embedded at compile time; a directory of `*.tera` files may
//! be layered over them, where a file replaces the embedded template with the
//! same id (its path relative to the directory, e.g. `python/Jenkinsfile.tera`).

use super::context::GenerationContext;
use crate::error::TemplateError;
use std::error::Error as _;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, trace};

const OVERRIDES_ID: &str = "<overrides>";

#[derive(rust_embed::RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Renders a template id with a generation context.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template_id: &str, context: &GenerationContext)
        -> Result<String, TemplateError>;

    fn has_template(&self, template_id: &str) -> bool;
}

/// Tera-backed renderer.
#[derive(Debug)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Renderer over the templates compiled into the binary.
    pub fn embedded() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        for id in EmbeddedTemplates::iter() {
            let file = EmbeddedTemplates::get(&id)
                .ok_or_else(|| TemplateError::new(&*id, "embedded template not found"))?;
            let content = std::str::from_utf8(file.data.as_ref())
                .map_err(|e| TemplateError::new(&*id, format!("invalid UTF-8: {}", e)))?;
            tera.add_raw_template(&id, content)
                .map_err(|e| template_error(&id, &e))?;
            trace!(template = %id, "loaded embedded template");
        }
        Ok(Self { tera })
    }

    /// Embedded templates, overridden by the files under `dir` when given.
    pub fn with_overrides(dir: Option<&Path>) -> Result<Self, TemplateError> {
        let mut renderer = Self::embedded()?;
        if let Some(dir) = dir {
            renderer.overlay(dir)?;
        }
        Ok(renderer)
    }

    /// Renderer over in-memory `(id, source)` pairs only.
    pub fn from_raw(templates: &[(&str, &str)]) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())
            .map_err(|e| template_error("<raw>", &e))?;
        Ok(Self { tera })
    }

    pub fn template_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tera.get_template_names().map(str::to_string).collect();
        ids.sort();
        ids
    }

    fn overlay(&mut self, dir: &Path) -> Result<(), TemplateError> {
        if !dir.is_dir() {
            return Err(TemplateError::new(
                OVERRIDES_ID,
                format!("template directory {} does not exist", dir.display()),
            ));
        }
        let walker = ignore::WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| TemplateError::new(OVERRIDES_ID, e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file())
                || !path.extension().is_some_and(|ext| ext == "tera")
            {
                continue;
            }
            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            let id = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read_to_string(path).map_err(|e| {
                TemplateError::new(id.as_str(), format!("cannot read {}: {}", path.display(), e))
            })?;
            self.tera
                .add_raw_template(&id, &content)
                .map_err(|e| template_error(&id, &e))?;
            debug!(template = %id, path = %path.display(), "template override loaded");
        }
        Ok(())
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(
        &self,
        template_id: &str,
        context: &GenerationContext,
    ) -> Result<String, TemplateError> {
        let context = Context::from_serialize(context)
            .map_err(|e| template_error(template_id, &e))?;
        self.tera
            .render(template_id, &context)
            .map_err(|e| template_error(template_id, &e))
    }

    fn has_template(&self, template_id: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template_id)
    }
}

/// Flattens a tera error and its causes; the outer message alone rarely
/// names the offending variable.
fn template_error(template_id: &str, error: &tera::Error) -> TemplateError {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TemplateError::new(template_id, message)
}
