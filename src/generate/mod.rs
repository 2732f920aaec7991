//! Pipeline generation: context building, template rendering and the
//! per-platform generator.

pub mod context;
pub mod generator;
pub mod templates;

pub use context::GenerationContext;
pub use generator::{GenerationResult, PlatformGenerator, SkippedArtifact, DEFAULT_PLATFORM};
pub use templates::{TemplateRenderer, TeraRenderer};
