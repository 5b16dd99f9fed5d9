//! Text processing utilities.
//!
//! Sentence splitting, word extraction, and paragraph splitting for
//! [`crate::analysis`]. Abbreviations, decimals and ellipses are not
//! special-cased.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of sentence terminators.
static TERMINATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// One or more blank lines (a line holding only whitespace counts as blank).
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

/// Split text into sentence fragments on runs of `.`, `!` and `?`.
///
/// Whitespace-only fragments are dropped. Text without any terminator is a
/// single fragment. Fragments keep their original casing and whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    TERMINATOR_RUN
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Split text into paragraphs separated by blank lines.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    BLANK_LINES
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Lowercase the text and split it on whitespace.
///
/// Punctuation stays attached, so `"cat."` and `"cat"` are distinct tokens.
pub fn extract_words(text: &str) -> Vec<String> {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Keep only the ASCII lowercase letters of a token.
pub fn letters_only(token: &str) -> String {
    token.chars().filter(char::is_ascii_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sentences() {
        let sentences = split_sentences("This is a sentence. This is another sentence.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "This is a sentence");
        assert_eq!(sentences[1], " This is another sentence");
    }

    #[test]
    fn terminator_runs_collapse() {
        let sentences = split_sentences("Wow!!! Really?! Yes...");
        assert_eq!(sentences, vec!["Wow", " Really", " Yes"]);
    }

    #[test]
    fn no_terminator_is_one_sentence() {
        assert_eq!(split_sentences("i went to the park").len(), 1);
    }

    #[test]
    fn abbreviations_are_not_special() {
        // Dr. splits like any other period.
        assert_eq!(split_sentences("Dr. Smith came. He left.").len(), 3);
    }

    #[test]
    fn empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  . ! ").is_empty());
    }

    #[test]
    fn extract_words_keeps_punctuation() {
        let words = extract_words("  The cat. THE cat!  ");
        assert_eq!(words, vec!["the", "cat.", "the", "cat!"]);
    }

    #[test]
    fn split_paragraphs_on_blank_lines() {
        let text = "First paragraph.\n\nSecond paragraph.\n   \n\nThird.";
        assert_eq!(split_paragraphs(text).len(), 3);
    }

    #[test]
    fn single_newline_is_same_paragraph() {
        assert_eq!(split_paragraphs("Line one.\nLine two.").len(), 1);
    }

    #[test]
    fn letters_only_strips_everything_else() {
        assert_eq!(letters_only("however,"), "however");
        assert_eq!(letters_only("don't"), "dont");
        assert_eq!(letters_only("42"), "");
    }
}
