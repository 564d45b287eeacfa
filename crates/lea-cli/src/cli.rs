//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// lea - views and their dependencies from a directory of SQL and Python files
#[derive(Parser, Debug)]
#[command(name = "lea")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List views and their dependencies
    Ls(LsArgs),
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Directory containing one subdirectory per schema
    #[arg(default_value = "views", env = "LEA_VIEWS_DIR")]
    pub views_dir: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,

    /// Only list views in this schema
    #[arg(short, long)]
    pub schema: Option<String>,
}

/// List output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
