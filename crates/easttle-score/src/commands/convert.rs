//! Convert command: total raw score to scale score.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use easttle_score_core::chart_store::{self, FileChartStore};
use easttle_score_core::config::Config;
use easttle_score_core::curriculum;

use super::data_dir;

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Sum of the seven category scores.
    pub total: u32,
}

/// Look up a total in the active chart.
#[instrument(name = "cmd_convert", skip_all, fields(total = args.total))]
pub fn cmd_convert(args: ConvertArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!("executing convert command");

    let store = FileChartStore::in_dir(&data_dir(config)?);
    let conversion = chart_store::convert(args.total, &store);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&conversion)?);
        return Ok(());
    }

    print!(
        "{} -> {} ± {} aWs, level {}",
        conversion.total_score,
        conversion.scale_score.bold(),
        conversion.error_margin,
        conversion.curriculum_level.bold()
    );
    match curriculum::year_expectation(&conversion.curriculum_level) {
        Some(expected) => println!(" ({expected})"),
        None => println!(),
    }
    Ok(())
}
