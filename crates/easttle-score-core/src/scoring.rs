//! Rule-based category scoring on the e-asTTle 0–8 scale.
//!
//! Each category is a fixed linear formula over [`TextAnalysis`], floored and
//! then clamped to `0..=8`. Floor (not round) is part of the calibration and
//! decides boundary scores.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::{self, TextAnalysis};

/// Highest score a single category can receive.
pub const MAX_CATEGORY_SCORE: u8 = 8;

/// Per-category level labels indexed by score.
const CATEGORY_LEVELS: [&str; 9] = ["1B", "1P", "1A", "2B", "2P", "2A", "3B", "3P", "3A"];

/// One of the seven rubric categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    /// Depth and development of ideas.
    Ideas,
    /// Paragraphing and overall shape.
    Structure,
    /// Linking of ideas across the text.
    Organisation,
    /// Word choice.
    Vocabulary,
    /// Sentence variety and control.
    #[serde(rename = "Sentence Style")]
    SentenceStyle,
    /// Punctuation use.
    Punctuation,
    /// Spelling accuracy.
    Spelling,
}

impl Category {
    /// All categories in rubric order.
    pub const ALL: [Self; 7] = [
        Self::Ideas,
        Self::Structure,
        Self::Organisation,
        Self::Vocabulary,
        Self::SentenceStyle,
        Self::Punctuation,
        Self::Spelling,
    ];

    /// The rubric name, used as the key in serialized score maps.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ideas => "Ideas",
            Self::Structure => "Structure",
            Self::Organisation => "Organisation",
            Self::Vocabulary => "Vocabulary",
            Self::SentenceStyle => "Sentence Style",
            Self::Punctuation => "Punctuation",
            Self::Spelling => "Spelling",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores for all seven categories, each in `0..=8`.
///
/// Serializes as a map keyed by the rubric names ("Ideas", "Sentence Style", ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryScores {
    /// Ideas score.
    #[serde(rename = "Ideas")]
    pub ideas: u8,
    /// Structure score.
    #[serde(rename = "Structure")]
    pub structure: u8,
    /// Organisation score.
    #[serde(rename = "Organisation")]
    pub organisation: u8,
    /// Vocabulary score.
    #[serde(rename = "Vocabulary")]
    pub vocabulary: u8,
    /// Sentence Style score.
    #[serde(rename = "Sentence Style")]
    pub sentence_style: u8,
    /// Punctuation score.
    #[serde(rename = "Punctuation")]
    pub punctuation: u8,
    /// Spelling score.
    #[serde(rename = "Spelling")]
    pub spelling: u8,
}

impl CategoryScores {
    /// Score for one category.
    pub const fn get(&self, category: Category) -> u8 {
        match category {
            Category::Ideas => self.ideas,
            Category::Structure => self.structure,
            Category::Organisation => self.organisation,
            Category::Vocabulary => self.vocabulary,
            Category::SentenceStyle => self.sentence_style,
            Category::Punctuation => self.punctuation,
            Category::Spelling => self.spelling,
        }
    }

    /// Categories paired with their scores, in rubric order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u8)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Raw total, the sum of all seven scores (0–56).
    pub fn total(&self) -> u32 {
        self.iter().map(|(_, s)| u32::from(s)).sum()
    }

    /// Mean category score.
    pub fn average(&self) -> f64 {
        f64::from(self.total()) / Category::ALL.len() as f64
    }

    /// Categories scoring 6 or more.
    pub fn strengths(&self) -> Vec<Category> {
        self.iter().filter(|&(_, s)| s >= 6).map(|(c, _)| c).collect()
    }

    /// Categories scoring 3 or less.
    pub fn growth_areas(&self) -> Vec<Category> {
        self.iter().filter(|&(_, s)| s <= 3).map(|(c, _)| c).collect()
    }
}

/// Score a piece of writing.
///
/// Text without any words scores 0 in every category except Spelling,
/// which stays at 8 because there are no misspellings to deduct.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn score(text: &str) -> CategoryScores {
    let analysis = analysis::analyze(text);
    score_analysis(&analysis)
}

/// Apply the category formulas to precomputed statistics.
pub fn score_analysis(a: &TextAnalysis) -> CategoryScores {
    let spelling = clamp_floor(8.0 - (a.spelling_errors / 5) as f64);

    if a.word_count == 0 {
        return CategoryScores {
            spelling,
            ..CategoryScores::default()
        };
    }

    let scores = CategoryScores {
        ideas: clamp_floor(a.word_count as f64 / 50.0 + a.unique_words as f64 / 30.0),
        structure: clamp_floor((a.paragraph_count as f64).mul_add(2.0, a.complex_ratio() * 4.0)),
        organisation: clamp_floor(
            (a.paragraph_count as f64).mul_add(1.5, a.transition_words as f64 / 2.0),
        ),
        vocabulary: clamp_floor(a.vocabulary_richness / 15.0 + (a.average_word_length - 3.0)),
        sentence_style: clamp_floor(a.average_sentence_length / 5.0 + a.complex_ratio() * 4.0),
        punctuation: clamp_floor(f64::from(a.punctuation_score) / 12.5),
        spelling,
    };
    tracing::debug!(total = scores.total(), "categories scored");
    scores
}

/// Per-category level label for a 0–8 score (`1B` … `3A`).
///
/// Scores above 8 map to the top label.
pub fn level_for_score(score: u8) -> &'static str {
    CATEGORY_LEVELS[usize::from(score.min(MAX_CATEGORY_SCORE))]
}

fn clamp_floor(value: f64) -> u8 {
    // NaN clamps to 0 via the cast.
    value.floor().clamp(0.0, f64::from(MAX_CATEGORY_SCORE)) as u8
}
