//! Expectations command: curriculum expectations for a year level.

use clap::Args;
use serde_json::json;
use tracing::{debug, instrument};

use easttle_score_core::curriculum::{self, Strand};

/// Arguments for the `expectations` subcommand.
#[derive(Args, Debug)]
pub struct ExpectationsArgs {
    /// Year level (0-8).
    #[arg(value_parser = clap::value_parser!(u8).range(0..=8))]
    pub year: u8,
}

/// Print what writers at a year level usually do, and what comes next.
#[instrument(name = "cmd_expectations", skip_all, fields(year = args.year))]
pub fn cmd_expectations(args: ExpectationsArgs, global_json: bool) -> anyhow::Result<()> {
    debug!("executing expectations command");

    let Some(year) = curriculum::curriculum_for_year(args.year) else {
        anyhow::bail!("no curriculum data for year {}", args.year);
    };

    if global_json {
        let strands: Vec<_> = Strand::ALL
            .iter()
            .map(|&strand| {
                let e = year.strand(strand);
                json!({
                    "strand": strand,
                    "current": e.current,
                    "next_steps": e.next_steps,
                })
            })
            .collect();
        let out = json!({
            "year_level": year.year_level,
            "phase": year.phase(),
            "strands": strands,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", year.summary());
    }
    Ok(())
}
