use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Project stack detection and CI/CD pipeline generation
#[derive(Parser, Debug)]
#[command(
    name = "pipeforge",
    about = "Project stack detection and CI/CD pipeline generation",
    version,
    author,
    long_about = "pipeforge classifies a project directory (language, build tool, framework, \
                  test framework, runtime version) and generates Jenkins, GitLab CI and \
                  GitHub Actions pipelines plus a Dockerfile tailored to it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Classify a project and print its descriptor",
        long_about = "Inspects the project's manifests, lock files and sources and prints \
                      the detected ecosystem and project descriptor.\n\n\
                      Examples:\n  \
                      pipeforge detect\n  \
                      pipeforge detect /path/to/project --format json\n  \
                      pipeforge detect --ecosystem gradle"
    )]
    Detect(DetectArgs),

    #[command(
        visible_alias = "generate",
        about = "Generate pipeline files for a project",
        long_about = "Classifies the project and writes one pipeline file per requested \
                      platform plus a Dockerfile.\n\n\
                      Examples:\n  \
                      pipeforge init\n  \
                      pipeforge init /path/to/project --platforms jenkins,github\n  \
                      pipeforge generate --ecosystem python --output-dir ci/"
    )]
    Init(InitArgs),

    #[command(about = "List supported ecosystems in detection order")]
    List(ListArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(value_name = "PATH", help = "Project directory (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'e',
        long,
        value_name = "NAME",
        help = "Skip detection and use this ecosystem"
    )]
    pub ecosystem: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(value_name = "PATH", help = "Project directory (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'e',
        long,
        value_name = "NAME",
        help = "Skip detection and use this ecosystem"
    )]
    pub ecosystem: Option<String>,

    #[arg(
        short = 'p',
        long,
        value_name = "PLATFORMS",
        value_delimiter = ',',
        help = "Platforms to generate: jenkins, gitlab, github (defaults to PIPEFORGE_PLATFORMS)"
    )]
    pub platforms: Vec<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory to write into (defaults to the project directory)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
