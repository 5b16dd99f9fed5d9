//! History command: saved assessments.

use anyhow::Context;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use easttle_score_core::assessment::{Assessment, AssessmentStore, JsonFileAssessmentStore};
use easttle_score_core::chart::ScaleConversion;
use easttle_score_core::chart_store::{self, FileChartStore};
use easttle_score_core::config::Config;
use easttle_score_core::feedback::{Audience, Depth, FeedbackGrid};
use easttle_score_core::report;
use easttle_score_core::rubric_store::{FileRubricStore, RubricStore};

use super::assess::print_assessment;
use super::data_dir;

/// Arguments for the `history` subcommand.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// What to do with the history.
    #[command(subcommand)]
    pub action: HistoryAction,
}

/// History actions.
#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List saved assessments, newest first
    List,
    /// Show one saved assessment
    Show(ShowArgs),
    /// Delete every saved assessment
    Clear,
}

/// Arguments for `history show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Assessment id, as printed by `history list`.
    pub id: String,

    /// Who the feedback is for.
    #[arg(long, value_enum)]
    pub audience: Option<Audience>,

    /// How detailed the feedback is.
    #[arg(long, value_enum)]
    pub depth: Option<Depth>,

    /// Print the plain-text report instead of the summary.
    #[arg(long)]
    pub report: bool,
}

#[derive(Serialize)]
struct ListEntry<'a> {
    id: &'a str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    student_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_level: Option<u8>,
    total: u32,
}

impl<'a> From<&'a Assessment> for ListEntry<'a> {
    fn from(a: &'a Assessment) -> Self {
        Self {
            id: &a.id,
            timestamp: a.timestamp.to_rfc3339(),
            student_name: a.student_name.as_deref(),
            year_level: a.year_level,
            total: a.total(),
        }
    }
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    assessment: &'a Assessment,
    feedback_grid: FeedbackGrid,
    conversion: ScaleConversion,
}

/// Run a history action against the store in the data directory.
#[instrument(name = "cmd_history", skip_all)]
pub fn cmd_history(args: HistoryArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let dir = data_dir(config)?;
    let store = JsonFileAssessmentStore::in_dir(&dir);
    debug!(action = ?args.action, path = %store.path(), "executing history command");

    match args.action {
        HistoryAction::List => list(&store, global_json),
        HistoryAction::Show(show_args) => {
            let charts = FileChartStore::in_dir(&dir);
            let rubrics = FileRubricStore::in_dir(&dir);
            show(&store, &charts, &rubrics, show_args, global_json, config)
        }
        HistoryAction::Clear => {
            store.clear().context("failed to clear history")?;
            if global_json {
                println!("{}", serde_json::json!({ "cleared": true }));
            } else {
                println!("History cleared.");
            }
            Ok(())
        }
    }
}

fn list(store: &JsonFileAssessmentStore, global_json: bool) -> anyhow::Result<()> {
    let records = store.list().context("failed to read history")?;
    if global_json {
        let entries: Vec<ListEntry<'_>> = records.iter().map(ListEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No saved assessments.");
        return Ok(());
    }
    for a in &records {
        let who = match (&a.student_name, a.year_level) {
            (Some(name), Some(year)) => format!("{name} (Year {year})"),
            (Some(name), None) => name.clone(),
            (None, Some(year)) => format!("Year {year}"),
            (None, None) => String::new(),
        };
        println!(
            "{}  {}  {:>2}/56  {}",
            a.id.cyan(),
            a.timestamp.format("%Y-%m-%d %H:%M"),
            a.total(),
            who
        );
    }
    Ok(())
}

fn show(
    store: &JsonFileAssessmentStore,
    charts: &FileChartStore,
    rubrics: &FileRubricStore,
    args: ShowArgs,
    global_json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let assessment = store
        .get(&args.id)
        .context("failed to read history")?
        .with_context(|| format!("no saved assessment with id {}", args.id))?;
    let conversion = chart_store::convert(assessment.total(), charts);
    let audience = args.audience.unwrap_or(config.feedback.audience);
    let depth = args.depth.unwrap_or(config.feedback.depth);

    if args.report {
        let rubric = rubrics.active_rubric();
        print!(
            "{}",
            report::render_text(&assessment, &conversion, &rubric, audience, depth)
        );
    } else if global_json {
        let output = ShowOutput {
            assessment: &assessment,
            feedback_grid: assessment.feedback.normalize(),
            conversion,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} {}",
            "Assessment".dimmed(),
            assessment.timestamp.format("%Y-%m-%d %H:%M UTC")
        );
        print_assessment(&assessment, &conversion, audience, depth);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use easttle_score_core::assessment::{AssessOptions, assess};
    use easttle_score_core::{chart, rubric};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config, JsonFileAssessmentStore) {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let store = JsonFileAssessmentStore::in_dir(&dir);
        let config = Config {
            data_dir: Some(dir),
            ..Config::default()
        };
        (tmp, config, store)
    }

    fn saved(store: &JsonFileAssessmentStore, id: &str) {
        let mut outcome = assess(
            "The sun is hot. We went to the beach.",
            &AssessOptions::default(),
            &chart::default_chart(),
            &rubric::default_rubric(),
        );
        outcome.assessment.id = id.to_string();
        store.save(outcome.assessment).unwrap();
    }

    fn show_args(id: &str, report: bool) -> HistoryArgs {
        HistoryArgs {
            action: HistoryAction::Show(ShowArgs {
                id: id.to_string(),
                audience: Some(Audience::Parent),
                depth: None,
                report,
            }),
        }
    }

    #[test]
    fn list_empty_history() {
        let (_tmp, config, _store) = setup();
        cmd_history(HistoryArgs { action: HistoryAction::List }, false, &config).unwrap();
        cmd_history(HistoryArgs { action: HistoryAction::List }, true, &config).unwrap();
    }

    #[test]
    fn show_known_and_unknown_ids() {
        let (_tmp, config, store) = setup();
        saved(&store, "100");
        cmd_history(show_args("100", false), true, &config).unwrap();
        cmd_history(show_args("100", true), false, &config).unwrap();

        let err = cmd_history(show_args("999", false), false, &config).unwrap_err();
        assert!(err.to_string().contains("no saved assessment with id 999"));
    }

    #[test]
    fn clear_removes_everything() {
        let (_tmp, config, store) = setup();
        saved(&store, "1");
        saved(&store, "2");
        cmd_history(HistoryArgs { action: HistoryAction::Clear }, false, &config).unwrap();
        assert!(store.list().unwrap().is_empty());
    }
}
