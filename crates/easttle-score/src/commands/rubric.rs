//! Rubric command: show, import or reset the level descriptors.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use easttle_score_core::config::Config;
use easttle_score_core::rubric::{self, RubricImport};
use easttle_score_core::rubric_store::{FileRubricStore, RubricStore};
use easttle_score_core::scoring::Category;

use super::chart::ImportFormat;
use super::{data_dir, read_input_file};

/// Arguments for the `rubric` subcommand.
#[derive(Args, Debug)]
pub struct RubricArgs {
    /// What to do with the rubric.
    #[command(subcommand)]
    pub action: RubricAction,
}

/// Rubric actions.
#[derive(Subcommand, Debug)]
pub enum RubricAction {
    /// Print the active rubric
    Show,
    /// Replace the custom rubric with descriptors read from a file
    Import(RubricImportArgs),
    /// Remove the custom rubric and use the built-in one
    Reset,
}

/// Arguments for `rubric import`.
#[derive(Args, Debug)]
pub struct RubricImportArgs {
    /// Text extracted from a rubric document, or a JSON rubric.
    pub file: Utf8PathBuf,

    /// How to read the file.
    #[arg(long, value_enum, default_value_t)]
    pub format: ImportFormat,
}

#[derive(Serialize)]
struct ImportSummary<'a> {
    imported: &'a [Category],
    defaulted: &'a [Category],
    fell_back: bool,
    path: &'a str,
}

/// Run a rubric action against the rubric stored in the data directory.
#[instrument(name = "cmd_rubric", skip_all)]
pub fn cmd_rubric(
    args: RubricArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let store = FileRubricStore::in_dir(&data_dir(config)?);
    debug!(action = ?args.action, path = %store.path(), "executing rubric command");

    match args.action {
        RubricAction::Show => show(&store, global_json),
        RubricAction::Import(import) => import_file(&store, &import, global_json, max_input_bytes),
        RubricAction::Reset => {
            store.reset().context("failed to remove custom rubric")?;
            if global_json {
                println!("{}", serde_json::json!({ "reset": true }));
            } else {
                println!("Custom rubric removed; using the built-in rubric.");
            }
            Ok(())
        }
    }
}

fn show(store: &FileRubricStore, global_json: bool) -> anyhow::Result<()> {
    let rubric = store.active_rubric();
    if global_json {
        println!("{}", serde_json::to_string_pretty(rubric.as_ref())?);
        return Ok(());
    }

    match rubric.last_updated {
        Some(when) if rubric.is_custom => println!(
            "{} (updated {})",
            "Custom rubric".bold(),
            when.format("%Y-%m-%d %H:%M UTC")
        ),
        _ => println!("{}", "Built-in rubric".bold()),
    }
    for category in &rubric.categories {
        println!("\n{}", category.name.as_str().cyan());
        for (level, description) in category.levels.iter().zip(&category.descriptions) {
            println!("  {level:<3} {description}");
        }
    }
    Ok(())
}

fn import_file(
    store: &FileRubricStore,
    args: &RubricImportArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = read_input_file(&args.file, max_input_bytes)?;
    let RubricImport {
        rubric,
        imported,
        defaulted,
        fell_back,
    } = if args.format.is_json(&args.file) {
        rubric::import_json(&content)
            .with_context(|| format!("failed to parse rubric in {}", args.file))?
    } else {
        rubric::parse_rubric_text(&content)
    };

    if fell_back {
        store.reset().context("failed to remove custom rubric")?;
    } else {
        store
            .set_custom_rubric(rubric)
            .context("failed to save custom rubric")?;
    }

    if global_json {
        let summary = ImportSummary {
            imported: &imported,
            defaulted: &defaulted,
            fell_back,
            path: store.path().as_str(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if fell_back {
        println!(
            "{} no rubric categories in {}; using the built-in rubric.",
            "warning:".yellow(),
            args.file
        );
    } else {
        println!(
            "{} imported {} categories from {}",
            "OK:".green(),
            imported.len(),
            args.file
        );
        if !defaulted.is_empty() {
            let names: Vec<&str> = defaulted.iter().map(|c| c.as_str()).collect();
            println!(
                "{} too few descriptors for {}; kept the built-in ones",
                "warning:".yellow(),
                names.join(", ")
            );
        }
    }
    Ok(())
}
