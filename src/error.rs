//! Error taxonomy.
//!
//! `NoEcosystemDetected`, `UnknownEcosystem`, `InvalidPlatform` and `Io` end an
//! invocation. `Template` and `FileWrite` only ever describe one platform
//! artifact; the generator records them as skipped and keeps going.

use crate::stack::PlatformId;
use std::path::PathBuf;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Error)]
pub enum PipeforgeError {
    #[error("No supported ecosystem detected in {}. Supported: {}. Use --ecosystem to choose one explicitly", path.display(), supported.join(", "))]
    NoEcosystemDetected {
        path: PathBuf,
        supported: Vec<String>,
    },

    #[error("Unknown ecosystem '{name}'{}. Available: {}", hint(suggestion), available.join(", "))]
    UnknownEcosystem {
        name: String,
        available: Vec<String>,
        suggestion: Option<String>,
    },

    #[error("Invalid platform(s): {}. Valid platforms: {}", invalid.join(", "), valid.join(", "))]
    InvalidPlatform {
        invalid: Vec<String>,
        valid: Vec<String>,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendering failure of one template.
#[derive(Debug, Clone, Error)]
#[error("Template '{template_id}' failed: {message}")]
pub struct TemplateError {
    pub template_id: String,
    pub message: String,
}

impl TemplateError {
    pub fn new(template_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            message: message.into(),
        }
    }
}

fn hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

/// Closest candidate to `input` when it is similar enough to be a typo.
pub fn closest_match<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (candidate, strsim::jaro_winkler(input, candidate)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}

/// Checks requested platform names against the allow-list before any
/// detection work; returns them de-duplicated in request order.
pub fn validate_platforms<S: AsRef<str>>(requested: &[S]) -> Result<Vec<PlatformId>, PipeforgeError> {
    let allowed = PlatformId::requestable();
    let mut platforms = Vec::new();
    let mut invalid = Vec::new();

    for name in requested {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        match PlatformId::from_name(&name.to_lowercase()).filter(|p| allowed.contains(p)) {
            Some(platform) if !platforms.contains(&platform) => platforms.push(platform),
            Some(_) => {}
            None => invalid.push(match closest_match(name, allowed.iter().map(|p| p.as_str())) {
                Some(suggestion) => format!("{} (did you mean '{}'?)", name, suggestion),
                None => name.to_string(),
            }),
        }
    }

    if !invalid.is_empty() {
        return Err(PipeforgeError::InvalidPlatform {
            invalid,
            valid: allowed.iter().map(|p| p.as_str().to_string()).collect(),
        });
    }
    Ok(platforms)
}
