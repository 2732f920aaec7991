//! Configuration management for pipeforge
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `PIPEFORGE_LOG_LEVEL`: Logging level - default: "info"
//! - `PIPEFORGE_LOG_JSON`: JSON log output (true|false) - default: "false"
//! - `PIPEFORGE_TEMPLATE_DIR`: Directory of `*.tera` files layered over the
//!   embedded templates - default: unset
//! - `PIPEFORGE_PLATFORMS`: Comma-separated platforms generated by `init` when
//!   `--platforms` is absent - default: "jenkins"
//!
//! # Example
//!
//! ```no_run
//! use pipeforge::PipeforgeConfig;
//!
//! let config = PipeforgeConfig::default();
//! config.validate().expect("Invalid configuration");
//! let renderer = config.renderer().expect("templates load");
//! ```

use crate::error::validate_platforms;
use crate::generate::{TeraRenderer, DEFAULT_PLATFORM};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_JSON: bool = false;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to load templates: {0}")]
    Templates(#[from] crate::error::TemplateError),
}

/// Effective settings for one pipeforge invocation.
///
/// `Default::default()` reads `PIPEFORGE_*` variables and falls back to
/// defaults for anything unset.
#[derive(Debug, Clone)]
pub struct PipeforgeConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_json: bool,

    /// Template override directory
    pub template_dir: Option<PathBuf>,

    /// Platforms generated when none are requested
    pub default_platforms: Vec<String>,
}

impl Default for PipeforgeConfig {
    fn default() -> Self {
        let log_level = env::var("PIPEFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("PIPEFORGE_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_LOG_JSON);

        let template_dir = env::var("PIPEFORGE_TEMPLATE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let default_platforms = env::var("PIPEFORGE_PLATFORMS")
            .ok()
            .map(|v| split_list(&v))
            .filter(|platforms| !platforms.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_PLATFORM.as_str().to_string()]);

        Self {
            log_level,
            log_json,
            template_dir,
            default_platforms,
        }
    }
}

impl PipeforgeConfig {
    /// Validates the configuration
    ///
    /// Checks that:
    /// - Log level is valid
    /// - The template directory, when set, is a directory
    /// - Default platforms are all on the allow-list
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(ref dir) = self.template_dir {
            if !dir.is_dir() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Template directory {} is not a directory",
                    dir.display()
                )));
            }
        }

        validate_platforms(self.default_platforms.as_slice())
            .map_err(|e| ConfigError::ValidationFailed(format!("PIPEFORGE_PLATFORMS: {}", e)))?;

        Ok(())
    }

    /// Embedded templates with the configured overrides applied.
    pub fn renderer(&self) -> Result<TeraRenderer, ConfigError> {
        Ok(TeraRenderer::with_overrides(self.template_dir.as_deref())?)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());
        if let Some(ref dir) = self.template_dir {
            map.insert("template_dir".to_string(), dir.display().to_string());
        }
        map.insert(
            "default_platforms".to_string(),
            self.default_platforms.join(","),
        );

        map
    }
}

impl fmt::Display for PipeforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeforge Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        match self.template_dir {
            Some(ref dir) => writeln!(f, "  Template Dir: {}", dir.display())?,
            None => writeln!(f, "  Template Dir: (embedded)")?,
        }
        writeln!(f, "  Default Platforms: {}", self.default_platforms.join(", "))?;
        Ok(())
    }
}

/// Splits a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
