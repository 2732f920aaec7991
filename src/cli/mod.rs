pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, DetectArgs, InitArgs, ListArgs};
pub use output::{OutputFormat, OutputFormatter};
