//! pipeforge - project stack detection and CI/CD pipeline generation
//!
//! Classifies a project directory into one ecosystem (language, build tool,
//! framework, test framework, runtime version) and renders CI/CD pipelines
//! and a container build file for it.
//!
//! # Core Concepts
//!
//! - **Evidence readers** ([`fs`]): file existence, contents and tree scans,
//!   with a mock file system for tests
//! - **Classification** ([`stack`]): ordered ecosystem classifiers producing a
//!   [`ProjectDescriptor`]
//! - **Generation** ([`generate`]): a flat template context and per-platform
//!   rendering with partial-failure isolation
//!
//! # Example Usage
//!
//! ```no_run
//! use pipeforge::{EcosystemRegistry, PlatformGenerator, TeraRenderer};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = EcosystemRegistry::with_defaults();
//! let (id, descriptor) = registry.classify(Path::new("."), None)?;
//!
//! let generator = PlatformGenerator::new(Arc::new(TeraRenderer::embedded()?));
//! let ecosystem = registry.get(id).expect("registered");
//! let result = generator.generate(ecosystem, &descriptor, Path::new("."), &["github".into()])?;
//! for (platform, path) in &result.generated_files {
//!     println!("{}: {}", platform, path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod generate;
pub mod stack;
pub mod util;

pub use config::{ConfigError, PipeforgeConfig};
pub use error::{PipeforgeError, TemplateError};
pub use fs::{FileSystem, MockFileSystem, ProjectFiles, RealFileSystem};
pub use generate::{GenerationContext, GenerationResult, PlatformGenerator, TeraRenderer};
pub use stack::{Ecosystem, EcosystemId, EcosystemRegistry, PlatformId, ProjectDescriptor};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
