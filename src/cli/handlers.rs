//! Command handlers. Each returns the process exit code; failures are
//! reported on stderr and map to 1.

use super::commands::{ConfigArgs, DetectArgs, InitArgs, ListArgs};
use super::output::OutputFormatter;
use crate::config::PipeforgeConfig;
use crate::error::validate_platforms;
use crate::generate::PlatformGenerator;
use crate::stack::EcosystemRegistry;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

pub fn handle_detect(args: &DetectArgs) -> i32 {
    report(run_detect(args))
}

pub fn handle_init(args: &InitArgs, config: &PipeforgeConfig) -> i32 {
    report(run_init(args, config))
}

pub fn handle_list(args: &ListArgs) -> i32 {
    report(
        OutputFormatter::new(args.format.into())
            .format_ecosystems(&EcosystemRegistry::with_defaults()),
    )
}

pub fn handle_config(args: &ConfigArgs, config: &PipeforgeConfig) -> i32 {
    if let Err(e) = config.validate() {
        error!("{}", e);
        eprintln!("Warning: {}", e);
    }
    report(OutputFormatter::new(args.format.into()).format_config(config))
}

fn run_detect(args: &DetectArgs) -> Result<String> {
    let path = project_path(args.path.as_deref());
    debug!(path = %path.display(), "Classifying project");

    let registry = EcosystemRegistry::with_defaults();
    let (id, descriptor) = registry.classify(&path, args.ecosystem.as_deref())?;

    OutputFormatter::new(args.format.into()).format_detection(id, &descriptor)
}

fn run_init(args: &InitArgs, config: &PipeforgeConfig) -> Result<String> {
    let requested = if args.platforms.is_empty() {
        &config.default_platforms
    } else {
        &args.platforms
    };
    let platforms: Vec<String> = validate_platforms(requested.as_slice())?
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();

    let path = project_path(args.path.as_deref());
    debug!(path = %path.display(), platforms = ?platforms, "Initializing pipelines");

    let registry = EcosystemRegistry::with_defaults();
    let (id, descriptor) = registry.classify(&path, args.ecosystem.as_deref())?;
    let ecosystem = registry
        .get(id)
        .with_context(|| format!("Ecosystem '{}' is not registered", id))?;

    let renderer = config
        .renderer()
        .context("Failed to load pipeline templates")?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| descriptor.project_path.clone())
        .unwrap_or(path);

    let result = PlatformGenerator::new(Arc::new(renderer)).generate(
        ecosystem,
        &descriptor,
        &output_dir,
        &platforms,
    )?;

    OutputFormatter::new(args.format.into()).format_generation(&result)
}

fn project_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn report(output: Result<String>) -> i32 {
    match output {
        Ok(text) => {
            println!("{}", text.trim_end());
            0
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
