//! Level descriptors for the seven rubric categories.
//!
//! The built-in rubric carries the standard e-asTTle descriptors. A custom
//! rubric is imported from text extracted from a rubric document, or from
//! JSON. An imported category needs at least [`MIN_DESCRIPTORS`] level
//! descriptors of its own; otherwise it keeps the built-in ones.

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RubricResult;
use crate::scoring::{self, Category, MAX_CATEGORY_SCORE};

/// Fewest descriptors an imported category may bring.
pub const MIN_DESCRIPTORS: usize = 7;

/// One descriptor per score, 0 through 8.
pub const LEVEL_COUNT: usize = MAX_CATEGORY_SCORE as usize + 1;

/// A category name, anywhere in the text.
static CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(ideas|structure|organisation|vocabulary|sentence\s+style|punctuation|spelling)\b",
    )
    .expect("valid regex")
});

/// A level marker such as `2P`.
static LEVEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[123][BPA]").expect("valid regex"));

/// Descriptors for one category, lowest level first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RubricCategory {
    /// The category described.
    pub name: Category,
    /// Level labels, `1B` to `3A`.
    #[serde(default = "level_labels")]
    pub levels: Vec<String>,
    /// Descriptor for each level.
    pub descriptions: Vec<String>,
}

impl RubricCategory {
    fn builtin(name: Category) -> Self {
        Self {
            name,
            levels: level_labels(),
            descriptions: builtin_row(name).iter().map(|d| (*d).to_string()).collect(),
        }
    }
}

/// A full rubric: descriptors for every category it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rubric {
    /// Categories in rubric order.
    pub categories: Vec<RubricCategory>,
    /// When the rubric was imported; `None` for the built-in rubric.
    #[serde(default, alias = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Whether this rubric was supplied by the user.
    #[serde(default, alias = "isCustom")]
    pub is_custom: bool,
}

impl Rubric {
    /// Descriptors for `category`, if the rubric covers it.
    pub fn category(&self, category: Category) -> Option<&RubricCategory> {
        self.categories.iter().find(|c| c.name == category)
    }

    /// Descriptor for a score in one category.
    ///
    /// Scores past the last descriptor take the last one. Categories the
    /// rubric leaves out use the built-in descriptors.
    pub fn descriptor(&self, category: Category, score: u8) -> &str {
        let index = usize::from(score.min(MAX_CATEGORY_SCORE));
        let custom = self
            .category(category)
            .and_then(|c| c.descriptions.get(index).or_else(|| c.descriptions.last()));
        match custom {
            Some(description) => description,
            None => builtin_row(category)[index],
        }
    }
}

fn level_labels() -> Vec<String> {
    (0..=MAX_CATEGORY_SCORE)
        .map(|score| scoring::level_for_score(score).to_string())
        .collect()
}

static DEFAULT_RUBRIC: LazyLock<Arc<Rubric>> = LazyLock::new(|| {
    Arc::new(Rubric {
        categories: Category::ALL.into_iter().map(RubricCategory::builtin).collect(),
        last_updated: None,
        is_custom: false,
    })
});

/// The built-in e-asTTle rubric.
pub fn default_rubric() -> Arc<Rubric> {
    Arc::clone(&DEFAULT_RUBRIC)
}

/// Outcome of importing a rubric.
#[derive(Debug, Clone, Serialize)]
pub struct RubricImport {
    /// The rubric to activate.
    pub rubric: Rubric,
    /// Categories that brought their own descriptors.
    pub imported: Vec<Category>,
    /// Categories found with too few descriptors, kept at the built-in ones.
    pub defaulted: Vec<Category>,
    /// True when no category was found and the built-in rubric was returned.
    pub fell_back: bool,
}

/// Build a custom rubric from candidate categories.
///
/// The first entry for each category wins. Categories come out in rubric
/// order. Nothing found means the built-in rubric, with `fell_back` set.
#[tracing::instrument(skip(found), fields(candidates = found.len()))]
pub fn import_categories(found: Vec<RubricCategory>) -> RubricImport {
    let mut categories = Vec::new();
    let mut imported = Vec::new();
    let mut defaulted = Vec::new();

    for name in Category::ALL {
        let Some(candidate) = found.iter().find(|c| c.name == name) else {
            continue;
        };
        if candidate.descriptions.len() >= MIN_DESCRIPTORS {
            let mut descriptions = candidate.descriptions.clone();
            descriptions.truncate(LEVEL_COUNT);
            categories.push(RubricCategory {
                name,
                levels: level_labels(),
                descriptions,
            });
            imported.push(name);
        } else {
            categories.push(RubricCategory::builtin(name));
            defaulted.push(name);
        }
    }

    if categories.is_empty() {
        tracing::warn!("no rubric categories found, using built-in rubric");
        return RubricImport {
            rubric: default_rubric().as_ref().clone(),
            imported,
            defaulted,
            fell_back: true,
        };
    }
    tracing::debug!(
        imported = imported.len(),
        defaulted = defaulted.len(),
        "rubric categories imported"
    );
    RubricImport {
        rubric: Rubric {
            categories,
            last_updated: Some(Utc::now()),
            is_custom: true,
        },
        imported,
        defaulted,
        fell_back: false,
    }
}

/// Import a rubric from extracted document text.
///
/// Each category's section runs from its name (followed by `:` or
/// whitespace) to the next category name. Inside a section, descriptors
/// follow level markers: `1B: Simple ideas 1P: Some development ...`.
pub fn parse_rubric_text(text: &str) -> RubricImport {
    import_categories(parse_categories(text))
}

/// Import a rubric from JSON: `{"categories": [{"name": ..., "descriptions": [...]}]}`.
pub fn import_json(json: &str) -> RubricResult<RubricImport> {
    let rubric: Rubric = serde_json::from_str(json)?;
    Ok(import_categories(rubric.categories))
}

/// Pull category sections and their descriptors out of free text.
pub fn parse_categories(text: &str) -> Vec<RubricCategory> {
    let marks: Vec<(Category, usize, usize)> = CATEGORY_PATTERN
        .find_iter(text)
        .filter_map(|m| category_named(m.as_str()).map(|c| (c, m.start(), m.end())))
        .collect();

    let mut found = Vec::new();
    for name in Category::ALL {
        let section = marks.iter().enumerate().find_map(|(i, &(c, _, end))| {
            if c != name {
                return None;
            }
            let rest = &text[end..];
            let from = end + (rest.len() - after_separator(rest)?.len());
            let stop = marks.get(i + 1).map_or(text.len(), |&(_, start, _)| start);
            Some(&text[from..stop.max(from)])
        });
        if let Some(section) = section {
            found.push(RubricCategory {
                name,
                levels: level_labels(),
                descriptions: extract_descriptions(section),
            });
        }
    }
    found
}

/// Descriptors that follow level markers in one category's section.
///
/// A descriptor runs from its marker to the next marker or the end of the
/// section, and may not contain the digits 1 to 3.
fn extract_descriptions(section: &str) -> Vec<String> {
    LEVEL_PATTERN
        .find_iter(section)
        .filter_map(|m| {
            let body = after_separator(&section[m.end()..])?;
            let stop = body.find(['1', '2', '3']).unwrap_or(body.len());
            let tail = &body[stop..];
            if !tail.is_empty() && !starts_with_level(tail) {
                return None;
            }
            let description = body[..stop].trim();
            (!description.is_empty()).then(|| description.to_string())
        })
        .collect()
}

/// The text after a run of `:` and whitespace; `None` if there is no run.
fn after_separator(text: &str) -> Option<&str> {
    let body = text.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    (body.len() < text.len()).then_some(body)
}

fn starts_with_level(text: &str) -> bool {
    LEVEL_PATTERN.find(text).is_some_and(|m| m.start() == 0)
}

fn category_named(raw: &str) -> Option<Category> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    Category::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(&name))
}

fn builtin_row(category: Category) -> &'static [&'static str; LEVEL_COUNT] {
    match category {
        Category::Ideas => &IDEAS,
        Category::Structure => &STRUCTURE,
        Category::Organisation => &ORGANISATION,
        Category::Vocabulary => &VOCABULARY,
        Category::SentenceStyle => &SENTENCE_STYLE,
        Category::Punctuation => &PUNCTUATION,
        Category::Spelling => &SPELLING,
    }
}

const IDEAS: [&str; LEVEL_COUNT] = [
    "Simple, minimal ideas",
    "Some development of ideas",
    "Clear ideas with some detail",
    "Ideas are developed",
    "Ideas show good understanding",
    "Ideas are well developed",
    "Complex ideas presented",
    "Sophisticated ideas",
    "Highly sophisticated ideas",
];

const STRUCTURE: [&str; LEVEL_COUNT] = [
    "Little structure",
    "Basic structure emerging",
    "Simple structure present",
    "Clear structure",
    "Good organization",
    "Well-organized",
    "Complex structure",
    "Sophisticated structure",
    "Highly sophisticated structure",
];

const ORGANISATION: [&str; LEVEL_COUNT] = [
    "Minimal organization",
    "Some sentence connection",
    "Basic paragraphing",
    "Clear paragraphs",
    "Good flow between ideas",
    "Well-connected ideas",
    "Complex connections",
    "Sophisticated transitions",
    "Highly sophisticated flow",
];

const VOCABULARY: [&str; LEVEL_COUNT] = [
    "Simple words",
    "Basic vocabulary",
    "Some variety",
    "Good word choice",
    "Varied vocabulary",
    "Precise words",
    "Rich vocabulary",
    "Sophisticated words",
    "Highly sophisticated vocabulary",
];

const SENTENCE_STYLE: [&str; LEVEL_COUNT] = [
    "Simple sentences",
    "Basic sentences",
    "Some variety",
    "Good variety",
    "Varied structures",
    "Complex sentences",
    "Sophisticated structures",
    "Highly varied",
    "Expertly crafted",
];

const PUNCTUATION: [&str; LEVEL_COUNT] = [
    "Minimal punctuation",
    "Basic punctuation",
    "Simple punctuation correct",
    "Most punctuation correct",
    "Good punctuation use",
    "Accurate punctuation",
    "Complex punctuation",
    "Sophisticated punctuation",
    "Expert punctuation",
];

const SPELLING: [&str; LEVEL_COUNT] = [
    "Many errors",
    "Frequent errors",
    "Some errors",
    "Mostly correct",
    "Few errors",
    "Accurate",
    "Very accurate",
    "Consistently accurate",
    "Expert spelling",
];
