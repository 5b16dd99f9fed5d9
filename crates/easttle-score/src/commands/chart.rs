//! Chart command: show, import or reset the conversion chart.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use easttle_score_core::chart_import::{self, ChartImport};
use easttle_score_core::chart_store::{ChartStore, FileChartStore};
use easttle_score_core::config::Config;

use super::{data_dir, read_input_file};

/// Arguments for the `chart` subcommand.
#[derive(Args, Debug)]
pub struct ChartArgs {
    /// What to do with the chart.
    #[command(subcommand)]
    pub action: ChartAction,
}

/// Chart actions.
#[derive(Subcommand, Debug)]
pub enum ChartAction {
    /// Print the active chart
    Show,
    /// Replace the custom chart with rows read from a file
    Import(ImportArgs),
    /// Remove the custom chart and use the built-in one
    Reset,
}

/// Arguments for `chart import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Text extracted from a chart document, or a JSON list of rows.
    pub file: Utf8PathBuf,

    /// How to read the file.
    #[arg(long, value_enum, default_value_t)]
    pub format: ImportFormat,
}

/// Input format for `chart import` and `rubric import`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    /// JSON for `.json` files, text otherwise.
    #[default]
    Auto,
    /// Text extracted from a document.
    Text,
    /// JSON: chart rows, or a rubric object.
    Json,
}

impl ImportFormat {
    /// Whether `file` should be read as JSON.
    pub fn is_json(self, file: &Utf8Path) -> bool {
        match self {
            Self::Json => true,
            Self::Text => false,
            Self::Auto => file.extension() == Some("json"),
        }
    }
}

#[derive(Serialize)]
struct ImportSummary<'a> {
    accepted: usize,
    rejected: usize,
    fell_back: bool,
    rows: usize,
    path: &'a str,
}

/// Run a chart action against the chart stored in the data directory.
#[instrument(name = "cmd_chart", skip_all)]
pub fn cmd_chart(
    args: ChartArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let store = FileChartStore::in_dir(&data_dir(config)?);
    debug!(action = ?args.action, path = %store.path(), "executing chart command");

    match args.action {
        ChartAction::Show => show(&store, global_json),
        ChartAction::Import(import) => import_file(&store, &import, global_json, max_input_bytes),
        ChartAction::Reset => {
            store.reset().context("failed to remove custom chart")?;
            if global_json {
                println!("{}", serde_json::json!({ "reset": true }));
            } else {
                println!("Custom chart removed; using the built-in chart.");
            }
            Ok(())
        }
    }
}

fn show(store: &FileChartStore, global_json: bool) -> anyhow::Result<()> {
    let chart = store.active_chart();
    if global_json {
        println!("{}", serde_json::to_string_pretty(chart.as_ref())?);
        return Ok(());
    }

    match chart.last_updated {
        Some(when) if chart.is_custom => println!(
            "{} (updated {})",
            "Custom chart".bold(),
            when.format("%Y-%m-%d %H:%M UTC")
        ),
        _ => println!("{}", "Built-in chart".bold()),
    }
    println!("{:>5} {:>6} {:>6}  {}", "Total", "Scale", "±", "Level");
    for row in chart.entries() {
        println!(
            "{:>5} {:>6} {:>6}  {}",
            row.total_score, row.scale_score, row.error_margin, row.curriculum_level
        );
    }
    Ok(())
}

fn import_file(
    store: &FileChartStore,
    args: &ImportArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = read_input_file(&args.file, max_input_bytes)?;
    let as_json = args.format.is_json(&args.file);
    let ChartImport {
        chart,
        accepted,
        rejected,
        fell_back,
    } = if as_json {
        chart_import::import_json(&content)
            .with_context(|| format!("failed to parse chart rows in {}", args.file))?
    } else {
        chart_import::parse_chart_text(&content)
    };

    let rows = chart.entries().len();
    if fell_back {
        store.reset().context("failed to remove custom chart")?;
    } else {
        store
            .set_custom_chart(chart)
            .context("failed to save custom chart")?;
    }

    if global_json {
        let summary = ImportSummary {
            accepted,
            rejected,
            fell_back,
            rows,
            path: store.path().as_str(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if fell_back {
        println!(
            "{} no usable rows in {}; using the built-in chart.",
            "warning:".yellow(),
            args.file
        );
    } else {
        println!(
            "{} imported {accepted} rows from {} ({rejected} skipped)",
            "OK:".green(),
            args.file
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()),
            ..Config::default()
        };
        (tmp, config)
    }

    fn import(file: Utf8PathBuf) -> ChartArgs {
        ChartArgs {
            action: ChartAction::Import(ImportArgs {
                file,
                format: ImportFormat::Auto,
            }),
        }
    }

    #[test]
    fn text_import_sets_custom_chart() {
        let (tmp, config) = setup();
        let file = Utf8PathBuf::try_from(tmp.path().join("chart.txt")).unwrap();
        std::fs::write(&file, "7 800 100 1B\n20 1500 70 3b\n").unwrap();

        cmd_chart(import(file), false, &config, None).unwrap();

        let store = FileChartStore::in_dir(config.data_dir.as_deref().unwrap());
        let chart = store.active_chart();
        assert!(chart.is_custom);
        assert_eq!(chart.entries().len(), 2);
        assert_eq!(chart.entries()[1].curriculum_level, "3B");
    }

    #[test]
    fn json_import_by_extension() {
        let (tmp, config) = setup();
        let file = Utf8PathBuf::try_from(tmp.path().join("rows.json")).unwrap();
        std::fs::write(
            &file,
            r#"[{"totalScore": 10, "scaleScore": 1000, "errorMargin": 90, "curriculumLevel": "1P"}]"#,
        )
        .unwrap();

        cmd_chart(import(file), true, &config, None).unwrap();
        let store = FileChartStore::in_dir(config.data_dir.as_deref().unwrap());
        assert_eq!(store.active_chart().first().scale_score, 1000);
    }

    #[test]
    fn import_without_rows_keeps_builtin_chart() {
        let (tmp, config) = setup();
        let file = Utf8PathBuf::try_from(tmp.path().join("empty.txt")).unwrap();
        std::fs::write(&file, "nothing useful here").unwrap();

        cmd_chart(import(file), false, &config, None).unwrap();
        let store = FileChartStore::in_dir(config.data_dir.as_deref().unwrap());
        assert!(!store.active_chart().is_custom);
        assert!(!store.path().exists());
    }

    #[test]
    fn reset_and_show() {
        let (_tmp, config) = setup();
        cmd_chart(ChartArgs { action: ChartAction::Reset }, false, &config, None).unwrap();
        cmd_chart(ChartArgs { action: ChartAction::Show }, true, &config, None).unwrap();
    }
}
