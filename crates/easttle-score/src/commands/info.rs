//! Info command implementation

use clap::Args;
use easttle_score_core::chart_store::{ChartStore, FileChartStore};
use easttle_score_core::config::{Config, ConfigSources};
use easttle_score_core::rubric_store::{FileRubricStore, RubricStore};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // Uses the global --json flag only
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_level: Option<u8>,
    audience: String,
    depth: String,
    custom_chart: bool,
    custom_rubric: bool,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let data_dir = config.resolve_data_dir().ok();
        let custom_chart = data_dir
            .as_deref()
            .is_some_and(|dir| FileChartStore::in_dir(dir).active_chart().is_custom);
        let custom_rubric = data_dir
            .as_deref()
            .is_some_and(|dir| FileRubricStore::in_dir(dir).active_rubric().is_custom);
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            data_dir: data_dir.map(|p| p.to_string()),
            input_limit: config.input_limit(),
            year_level: config.year_level,
            audience: config.feedback.audience.to_string(),
            depth: config.feedback.depth.to_string(),
            custom_chart,
            custom_rubric,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    match cfg.data_dir {
        Some(ref dir) => println!("{}: {}", "Data directory".dimmed(), dir),
        None => println!("{}: {}", "Data directory".dimmed(), "unavailable".yellow()),
    }
    match cfg.input_limit {
        Some(bytes) => println!("{}: {} bytes", "Input limit".dimmed(), bytes),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Scoring".bold().underline());
    print_opt("Default year level", &cfg.year_level);
    println!("{}: {} / {}", "Feedback".dimmed(), cfg.audience, cfg.depth);
    println!(
        "{}: {}",
        "Chart".dimmed(),
        if cfg.custom_chart { "custom" } else { "built-in" }
    );
    println!(
        "{}: {}",
        "Rubric".dimmed(),
        if cfg.custom_rubric { "custom" } else { "built-in" }
    );

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: &Option<T>) {
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}
