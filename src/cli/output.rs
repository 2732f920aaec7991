//! Output formatting for multiple formats
//!
//! Formatters for JSON, YAML and human-readable text. JSON and YAML carry the
//! same structure; human output is for terminals.
//!
//! # Example
//!
//! ```no_run
//! use pipeforge::cli::output::{OutputFormat, OutputFormatter};
//! use pipeforge::stack::EcosystemRegistry;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let (id, descriptor) = EcosystemRegistry::with_defaults().classify(Path::new("."), None)?;
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! println!("{}", formatter.format_detection(id, &descriptor)?);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::PipeforgeConfig;
use crate::generate::GenerationResult;
use crate::stack::{
    Ecosystem, EcosystemDetails, EcosystemId, EcosystemRegistry, LanguageId, PlatformId,
    ProjectDescriptor,
};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Serialized shape of `detect`.
#[derive(Debug, Serialize)]
pub struct DetectionReport<'a> {
    pub ecosystem: EcosystemId,
    pub descriptor: &'a ProjectDescriptor,
}

/// One row of `list`.
#[derive(Debug, Serialize)]
pub struct EcosystemSummary {
    pub id: EcosystemId,
    pub name: &'static str,
    pub language: LanguageId,
    pub template_family: &'static str,
    pub platforms: Vec<PlatformId>,
}

impl EcosystemSummary {
    pub fn of(ecosystem: &dyn Ecosystem) -> Self {
        let templates = ecosystem.templates();
        Self {
            id: ecosystem.id(),
            name: ecosystem.id().name(),
            language: ecosystem.language(),
            template_family: templates.family(),
            platforms: templates.platforms(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a classification result
    pub fn format_detection(
        &self,
        ecosystem: EcosystemId,
        descriptor: &ProjectDescriptor,
    ) -> Result<String> {
        let report = DetectionReport {
            ecosystem,
            descriptor,
        };
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .context("Failed to serialize detection result to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&report)
                .context("Failed to serialize detection result to YAML"),
            OutputFormat::Human => Ok(self.format_detection_human(&report)),
        }
    }

    /// Formats a generation result
    pub fn format_generation(&self, result: &GenerationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .context("Failed to serialize generation result to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(result)
                .context("Failed to serialize generation result to YAML"),
            OutputFormat::Human => Ok(self.format_generation_human(result)),
        }
    }

    /// Formats the registry in detection order
    pub fn format_ecosystems(&self, registry: &EcosystemRegistry) -> Result<String> {
        let summaries: Vec<EcosystemSummary> =
            registry.ecosystems().map(EcosystemSummary::of).collect();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&summaries)
                .context("Failed to serialize ecosystems to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&summaries).context("Failed to serialize ecosystems to YAML")
            }
            OutputFormat::Human => Ok(self.format_ecosystems_human(&summaries)),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &PipeforgeConfig) -> Result<String> {
        let config_map: BTreeMap<String, String> = config.to_display_map().into_iter().collect();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(self.format_config_human(&config_map)),
        }
    }

    // Human-readable formatting methods

    fn format_detection_human(&self, report: &DetectionReport<'_>) -> String {
        let descriptor = report.descriptor;
        let mut output = String::new();

        output.push_str("\u{2713} Project Detection Result\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!(
            "Ecosystem:       {} ({})\n",
            report.ecosystem,
            report.ecosystem.name()
        ));
        output.push_str(&format!("Language:        {}\n", descriptor.language.name()));
        output.push_str(&format!(
            "Framework:       {}\n",
            descriptor.framework.as_deref().unwrap_or("(generic)")
        ));
        output.push_str(&format!("Runtime Version: {}\n", descriptor.runtime_version));
        output.push_str(&format!("Test Framework:  {}\n", descriptor.test_framework));

        let details = detail_rows(&descriptor.details);
        if !details.is_empty() {
            output.push_str("\nDetails:\n");
            for (i, (label, value)) in details.iter().enumerate() {
                let connector = if i == details.len() - 1 {
                    "\u{2514}"
                } else {
                    "\u{251C}"
                };
                output.push_str(&format!("{}\u{2500} {:<16} {}\n", connector, label, value));
            }
        }

        if let Some(ref path) = descriptor.project_path {
            output.push_str(&format!("\nProject: {}\n", path.display()));
        }

        output
    }

    fn format_generation_human(&self, result: &GenerationResult) -> String {
        let mut output = String::new();

        if result.skipped.is_empty() {
            output.push_str("\u{2713} Pipeline Generation Result\n");
        } else {
            output.push_str("\u{26A0} Pipeline Generation Result (Partial)\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!(
            "Project:   {}\n",
            result.context.project_name()
        ));
        output.push_str(&format!(
            "Ecosystem: {} ({})\n\n",
            result.ecosystem,
            result.ecosystem.name()
        ));

        if result.generated_files.is_empty() {
            output.push_str("Generated Files: (none)\n");
        } else {
            output.push_str("Generated Files:\n");
            let count = result.generated_files.len();
            for (i, (platform, path)) in result.generated_files.iter().enumerate() {
                let connector = if i == count - 1 { "\u{2514}" } else { "\u{251C}" };
                output.push_str(&format!(
                    "{}\u{2500} {:<8} {}\n",
                    connector,
                    platform.as_str(),
                    path.display()
                ));
            }
        }

        if !result.skipped.is_empty() {
            output.push_str("\n\u{26A0} Skipped:\n");
            for skipped in &result.skipped {
                output.push_str(&format!("  - {}: {}\n", skipped.platform, skipped.reason));
            }
        }

        output
    }

    fn format_ecosystems_human(&self, summaries: &[EcosystemSummary]) -> String {
        let mut output = String::new();

        output.push_str("Supported Ecosystems (detection order)\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        for (i, summary) in summaries.iter().enumerate() {
            let platforms: Vec<&str> = summary.platforms.iter().map(|p| p.as_str()).collect();
            output.push_str(&format!(
                "{}. {:<7} {:<8} templates: {:<7} platforms: {}\n",
                i + 1,
                summary.id.as_str(),
                summary.language.name(),
                summary.template_family,
                platforms.join(", ")
            ));
        }

        output
    }

    fn format_config_human(&self, config_map: &BTreeMap<String, String>) -> String {
        let mut output = String::new();

        output.push_str("pipeforge Configuration\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        for (key, value) in config_map {
            output.push_str(&format!("  {:<18} {}\n", format!("{}:", key), value));
        }
        if !config_map.contains_key("template_dir") {
            output.push_str(&format!("  {:<18} (embedded)\n", "template_dir:"));
        }

        output
    }
}

fn detail_rows(details: &EcosystemDetails) -> Vec<(&'static str, String)> {
    match details {
        EcosystemDetails::Python { package_manager } | EcosystemDetails::Node { package_manager } => {
            vec![("Package Manager:", package_manager.to_string())]
        }
        EcosystemDetails::Maven {
            build_tool,
            is_multi_module,
            packaging,
        } => vec![
            ("Build Tool:", build_tool.to_string()),
            ("Multi-module:", is_multi_module.to_string()),
            ("Packaging:", packaging.clone()),
        ],
        EcosystemDetails::Gradle {
            build_tool,
            uses_kotlin_dsl,
            is_multi_project,
            packaging,
        } => vec![
            ("Build Tool:", build_tool.to_string()),
            ("Kotlin DSL:", uses_kotlin_dsl.to_string()),
            ("Multi-project:", is_multi_project.to_string()),
            ("Packaging:", packaging.clone()),
        ],
        EcosystemDetails::Java {
            build_tool,
            packaging,
        } => vec![
            ("Build Tool:", build_tool.to_string()),
            ("Packaging:", packaging.clone()),
        ],
        EcosystemDetails::DotNet {
            project_type,
            has_solution,
            is_web_app,
        } => vec![
            ("Project Type:", project_type.clone()),
            ("Solution:", has_solution.to_string()),
            ("Web App:", is_web_app.to_string()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{GenerationContext, SkippedArtifact};
    use crate::stack::BuildSystemId;
    use std::path::PathBuf;

    fn flask_descriptor() -> ProjectDescriptor {
        ProjectDescriptor::new(
            LanguageId::Python,
            "3.11",
            "pytest",
            EcosystemDetails::Python {
                package_manager: BuildSystemId::Pip,
            },
        )
        .with_framework(Some("flask"))
        .with_project_path("/srv/shop")
    }

    fn generation_result() -> GenerationResult {
        let mut generated_files = BTreeMap::new();
        generated_files.insert(PlatformId::Jenkins, PathBuf::from("/srv/shop/Jenkinsfile"));
        let mut fields = serde_json::Map::new();
        fields.insert("project_name".into(), "shop".into());
        GenerationResult {
            ecosystem: EcosystemId::Python,
            context: GenerationContext::from(fields),
            generated_files,
            skipped: vec![SkippedArtifact {
                platform: "docker".into(),
                reason: "Template 'python/Dockerfile.tera' failed: missing".into(),
            }],
        }
    }

    #[test]
    fn test_detection_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter
            .format_detection(EcosystemId::Python, &flask_descriptor())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["ecosystem"], "python");
        assert_eq!(value["descriptor"]["framework"], "flask");
        assert_eq!(value["descriptor"]["package_manager"], "pip");
        assert_eq!(value["descriptor"]["runtime_version"], "3.11");
    }

    #[test]
    fn test_detection_yaml() {
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter
            .format_detection(EcosystemId::Python, &flask_descriptor())
            .unwrap();
        assert!(output.contains("ecosystem: python"));
        assert!(output.contains("test_framework: pytest"));
    }

    #[test]
    fn test_detection_human() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter
            .format_detection(EcosystemId::Python, &flask_descriptor())
            .unwrap();
        assert!(output.contains("Project Detection Result"));
        assert!(output.contains("Framework:       flask"));
        assert!(output.contains("Package Manager:"));
        assert!(output.contains("/srv/shop"));
    }

    #[test]
    fn test_generic_framework_human() {
        let descriptor = ProjectDescriptor::new(
            LanguageId::Java,
            "17",
            "junit5",
            EcosystemDetails::Java {
                build_tool: BuildSystemId::None,
                packaging: "jar".to_string(),
            },
        );
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_detection(EcosystemId::Java, &descriptor)
            .unwrap();
        assert!(output.contains("(generic)"));
    }

    #[test]
    fn test_generation_human_lists_skipped() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_generation(&generation_result())
            .unwrap();
        assert!(output.contains("(Partial)"));
        assert!(output.contains("/srv/shop/Jenkinsfile"));
        assert!(output.contains("docker: Template"));
    }

    #[test]
    fn test_generation_json() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_generation(&generation_result())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["generated_files"]["jenkins"], "/srv/shop/Jenkinsfile");
        assert_eq!(value["context"]["project_name"], "shop");
        assert_eq!(value["skipped"][0]["platform"], "docker");
    }

    #[test]
    fn test_ecosystems_in_registry_order() {
        let registry = EcosystemRegistry::with_defaults();
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_ecosystems(&registry)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["python", "node", "maven", "gradle", "java", "dotnet"]);
        assert_eq!(value[2]["template_family"], "jvm");

        let human = OutputFormatter::new(OutputFormat::Human)
            .format_ecosystems(&registry)
            .unwrap();
        assert!(human.contains("1. python"));
    }

    #[test]
    fn test_config_formats() {
        let config = PipeforgeConfig {
            log_level: "info".into(),
            log_json: false,
            template_dir: None,
            default_platforms: vec!["jenkins".into()],
        };
        let json = OutputFormatter::new(OutputFormat::Json)
            .format_config(&config)
            .unwrap();
        assert!(json.contains("\"default_platforms\": \"jenkins\""));

        let human = OutputFormatter::new(OutputFormat::Human)
            .format_config(&config)
            .unwrap();
        assert!(human.contains("pipeforge Configuration"));
        assert!(human.contains("(embedded)"));
    }
}
