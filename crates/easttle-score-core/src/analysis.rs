//! Shallow text statistics feeding the category scorer.
//!
//! Every figure here is a surface count (words, sentences, ratios). Nothing
//! attempts real language understanding, and the spelling figure in
//! particular counts any word missing from [`COMMON_WORDS`] as an error.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::text;
use crate::word_lists::{COMMON_WORDS, TRANSITION_WORDS};

/// A capitalised run ending in a lowercase letter.
static CAPITALISED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][^.!?]*[a-z]").expect("valid regex"));

/// Statistics computed from one piece of writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextAnalysis {
    /// Non-blank fragments between runs of `.`, `!` or `?`.
    pub sentence_count: usize,
    /// Blank-line separated paragraphs, never less than 1.
    pub paragraph_count: usize,
    /// Whitespace-separated tokens.
    pub word_count: usize,
    /// Distinct lowercased tokens (punctuation kept).
    pub unique_words: usize,
    /// Mean token length in characters, 0 for empty text.
    pub average_word_length: f64,
    /// Words per sentence, 0 when there are no sentences.
    pub average_sentence_length: f64,
    /// Tokens matching the closed transition word list.
    pub transition_words: usize,
    /// Sentences containing `,`, `;` or `:`.
    pub complex_sentences: usize,
    /// Tokens longer than two letters that are not common words.
    pub spelling_errors: usize,
    /// Punctuation heuristic, 0 to 100.
    pub punctuation_score: u32,
    /// Type-token ratio as a percentage, 0 for empty text.
    pub vocabulary_richness: f64,
}

impl TextAnalysis {
    /// Share of sentences that are complex, 0 when there are no sentences.
    pub fn complex_ratio(&self) -> f64 {
        ratio(self.complex_sentences, self.sentence_count)
    }
}

/// Compute the statistics for `text`.
///
/// Never fails: empty or punctuation-only input yields zero counts with a
/// paragraph count of 1.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn analyze(text: &str) -> TextAnalysis {
    let sentences = text::split_sentences(text);
    let sentence_count = sentences.len();
    let paragraph_count = text::split_paragraphs(text).len().max(1);

    let words = text::extract_words(text);
    let word_count = words.len();
    let unique_words = words.iter().collect::<HashSet<_>>().len();

    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let average_word_length = ratio(total_chars, word_count);
    let average_sentence_length = ratio(word_count, sentence_count);

    let stripped: Vec<String> = words.iter().map(|w| text::letters_only(w)).collect();

    let transition_words = stripped
        .iter()
        .filter(|w| TRANSITION_WORDS.contains(w.as_str()))
        .count();

    let complex_sentences = sentences
        .iter()
        .filter(|s| s.contains([',', ';', ':']))
        .count();

    let spelling_errors = stripped
        .iter()
        .filter(|w| w.len() > 2 && !COMMON_WORDS.contains(w.as_str()))
        .count();

    let punctuation_score = punctuation_score(text, sentence_count);
    let vocabulary_richness = ratio(unique_words, word_count) * 100.0;

    let analysis = TextAnalysis {
        sentence_count,
        paragraph_count,
        word_count,
        unique_words,
        average_word_length,
        average_sentence_length,
        transition_words,
        complex_sentences,
        spelling_errors,
        punctuation_score,
        vocabulary_richness,
    };
    tracing::debug!(
        words = word_count,
        sentences = sentence_count,
        paragraphs = paragraph_count,
        "text analyzed"
    );
    analysis
}

/// Start at 100 and deduct for missing full stops, missing commas in longer
/// pieces, and capitalised runs that do not end in a full stop.
fn punctuation_score(text: &str, sentence_count: usize) -> u32 {
    let mut score: i32 = 100;
    if !text.contains('.') {
        score -= 30;
    }
    if sentence_count > 3 && !text.contains(',') {
        score -= 20;
    }
    if CAPITALISED_RUN
        .find_iter(text)
        .any(|m| !m.as_str().trim().ends_with('.'))
    {
        score -= 20;
    }
    score.max(0).unsigned_abs()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
