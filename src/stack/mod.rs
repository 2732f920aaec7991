//! Project classification.
//!
//! Strongly-typed identifiers (`EcosystemId`, `LanguageId`, `BuildSystemId`,
//! `PlatformId`), the [`ProjectDescriptor`] every classifier produces, the six
//! ecosystem classifiers and the ordered [`EcosystemRegistry`] that dispatches
//! between them.
//!
//! # Example
//!
//! ```no_run
//! use pipeforge::stack::EcosystemRegistry;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = EcosystemRegistry::with_defaults();
//! let (ecosystem, descriptor) = registry.classify(Path::new("."), None)?;
//! println!("{} {}", ecosystem, descriptor.runtime_version);
//! # Ok(())
//! # }
//! ```

#[macro_use]
pub mod id_enum_macro;

pub mod build_system_id;
pub mod descriptor;
pub mod ecosystem;
pub mod ecosystem_id;
pub mod language_id;
pub mod parsers;
pub mod registry;

pub use build_system_id::BuildSystemId;
pub use descriptor::{EcosystemDetails, ProjectDescriptor};
pub use ecosystem::{ContextFields, Ecosystem, PlatformTemplate, PlatformTemplateMap};
pub use ecosystem_id::{EcosystemId, PlatformId};
pub use language_id::LanguageId;
pub use registry::EcosystemRegistry;
