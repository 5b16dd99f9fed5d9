//! Analyze command: the text statistics behind the scores.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use easttle_score_core::analysis;

use super::read_input;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// File to analyze. Reads stdin when omitted or `-`.
    pub file: Option<Utf8PathBuf>,
}

/// Print the statistics computed for a piece of writing.
#[instrument(name = "cmd_analyze", skip_all, fields(file = ?args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!("executing analyze command");

    let text = read_input(args.file.as_deref(), max_input_bytes)?;
    let a = analysis::analyze(&text);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&a)?);
        return Ok(());
    }

    if let Some(ref file) = args.file {
        println!("{}", file.bold());
    }
    println!(
        "  {} {} words, {} sentences, {} paragraphs",
        "Length:".cyan(),
        a.word_count,
        a.sentence_count,
        a.paragraph_count
    );
    println!(
        "  {} {} unique ({:.1}% richness), average {:.1} letters",
        "Words:".cyan(),
        a.unique_words,
        a.vocabulary_richness,
        a.average_word_length
    );
    println!(
        "  {} {:.1} words on average, {} complex",
        "Sentences:".cyan(),
        a.average_sentence_length,
        a.complex_sentences
    );
    println!("  {} {}", "Transitions:".cyan(), a.transition_words);
    println!("  {} {}", "Possible misspellings:".cyan(), a.spelling_errors);
    println!("  {} {}/100", "Punctuation:".cyan(), a.punctuation_score);
    Ok(())
}
