//! Assess command: score writing, convert the total and show feedback.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use easttle_score_core::assessment::{
    AssessOptions, Assessment, AssessmentOutcome, AssessmentStore, JsonFileAssessmentStore,
};
use easttle_score_core::chart::ScaleConversion;
use easttle_score_core::chart_store::{ChartStore, FileChartStore};
use easttle_score_core::config::Config;
use easttle_score_core::feedback::{Audience, Depth};
use easttle_score_core::rubric_store::{FileRubricStore, RubricStore};
use easttle_score_core::{assessment, curriculum, scoring};

use super::{data_dir, paint_score, read_input};

/// Arguments for the `assess` subcommand.
#[derive(Args, Debug, Default)]
pub struct AssessArgs {
    /// File to score. Reads stdin when omitted or `-`.
    pub file: Option<Utf8PathBuf>,

    /// Student's name, stored with the assessment.
    #[arg(long)]
    pub student: Option<String>,

    /// Year level (0-8) used to suggest curriculum next steps.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=8))]
    pub year: Option<u8>,

    /// Who the feedback is for.
    #[arg(long, value_enum)]
    pub audience: Option<Audience>,

    /// How detailed the feedback is.
    #[arg(long, value_enum)]
    pub depth: Option<Depth>,

    /// Do not save the assessment to history.
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Serialize)]
struct AssessOutput<'a> {
    #[serde(flatten)]
    outcome: &'a AssessmentOutcome,
    selected_feedback: String,
    saved: bool,
}

/// Score a piece of writing.
#[instrument(name = "cmd_assess", skip_all, fields(file = ?args.file))]
pub fn cmd_assess(
    args: AssessArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(year = ?args.year, no_save = args.no_save, "executing assess command");

    let text = read_input(args.file.as_deref(), max_input_bytes)?;
    let audience = args.audience.unwrap_or(config.feedback.audience);
    let depth = args.depth.unwrap_or(config.feedback.depth);

    let dir = data_dir(config)?;
    let chart = FileChartStore::in_dir(&dir).active_chart();
    let rubric = FileRubricStore::in_dir(&dir).active_rubric();
    let options = AssessOptions {
        student_name: args.student,
        year_level: args.year.or(config.year_level),
    };
    let outcome = assessment::assess(&text, &options, &chart, &rubric);

    let saved = !args.no_save;
    if saved {
        JsonFileAssessmentStore::in_dir(&dir)
            .save(outcome.assessment.clone())
            .context("failed to save assessment")?;
    }

    let selected_feedback = outcome.assessment.feedback.select(audience, depth);
    if global_json {
        let output = AssessOutput {
            outcome: &outcome,
            selected_feedback,
            saved,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_assessment(&outcome.assessment, &outcome.conversion, audience, depth);
    if saved {
        println!("\n{} {}", "Saved as".dimmed(), outcome.assessment.id);
    }
    Ok(())
}

/// Print scores, conversion, the selected feedback and any next steps.
pub(crate) fn print_assessment(
    record: &Assessment,
    conversion: &ScaleConversion,
    audience: Audience,
    depth: Depth,
) {
    if let Some(ref name) = record.student_name {
        println!("{}", name.bold());
    }
    for (category, score) in record.scores.iter() {
        println!(
            "  {:<15} {:<3} {}",
            category.as_str(),
            scoring::level_for_score(score),
            paint_score(score)
        );
    }
    println!(
        "\n{} {}/56 (average {:.1}/8)",
        "Total:".cyan(),
        record.total(),
        record.scores.average()
    );
    let expected = curriculum::year_expectation(&conversion.curriculum_level)
        .map(|e| format!(" ({e})"))
        .unwrap_or_default();
    println!(
        "{} {} ± {} aWs, level {}{}",
        "Scale score:".cyan(),
        conversion.scale_score.bold(),
        conversion.error_margin,
        conversion.curriculum_level.bold(),
        expected
    );

    println!("\n{}", format!("Feedback ({audience}, {depth})").bold().underline());
    println!("{}", record.feedback.select(audience, depth));

    if let Some(ref steps) = record.next_steps {
        println!("\n{}", "Next steps".bold().underline());
        for step in &steps.teacher_next_steps {
            println!("  - {step}");
        }
        println!("{} {}", "Writing book:".dimmed(), steps.student_book_feedback);
    }
}
