//! Library interface for the `easttle-score` CLI.
//!
//! Exposes the argument parser and command structure so `xtask` can build
//! man pages and shell completions, and so commands can be unit tested.
//! The entry point is in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Set the global color mode. Call once at startup.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                     Log filter (e.g., debug, easttle_score_core=trace)
    EASTTLE_SCORE_LOG_PATH       Explicit log file path
    EASTTLE_SCORE_LOG_DIR        Log directory
    EASTTLE_SCORE_DATA_DIR       Where history and the custom chart are stored
    EASTTLE_SCORE_YEAR_LEVEL     Default year level for next steps
";

/// Command-line interface definition for easttle-score.
#[derive(Parser)]
#[command(name = "easttle-score")]
#[command(
    about = "Score student writing against the e-asTTle rubric and convert totals to scale scores",
    long_about = None
)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Score a piece of writing and show feedback
    Assess(commands::assess::AssessArgs),

    /// Show the text statistics behind the scores
    Analyze(commands::analyze::AnalyzeArgs),

    /// Convert a total raw score to a scale score
    Convert(commands::convert::ConvertArgs),

    /// Manage the scale score conversion chart
    Chart(commands::chart::ChartArgs),

    /// Manage the rubric level descriptors
    Rubric(commands::rubric::RubricArgs),

    /// Show curriculum expectations for a year level
    Expectations(commands::expectations::ExpectationsArgs),

    /// List, show or clear saved assessments
    History(commands::history::HistoryArgs),

    /// Show package and configuration information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
