//! Assessment records, the scoring pipeline that produces them, and the
//! stores that keep the most recent ones.
//!
//! A store keeps at most [`MAX_ASSESSMENTS`] records, newest first; saving
//! one more evicts the oldest.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::{self, TextAnalysis};
use crate::chart::{ScaleConversion, ScoringChart};
use crate::curriculum::{self, NextSteps};
use crate::error::StoreResult;
use crate::feedback::{self, StoredFeedback};
use crate::persist;
use crate::rubric::Rubric;
use crate::scoring::{self, Category, CategoryScores};

/// Number of assessments a store retains.
pub const MAX_ASSESSMENTS: usize = 10;

/// File name of the stored history inside the data directory.
pub const ASSESSMENTS_FILE: &str = "assessments.json";

/// One scored piece of writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Assessment {
    /// Opaque identifier (creation time in milliseconds).
    pub id: String,
    /// The writing that was scored.
    pub text: String,
    /// Category scores.
    pub scores: CategoryScores,
    /// Feedback in whichever shape it was stored.
    pub feedback: StoredFeedback,
    /// When the assessment was made.
    pub timestamp: DateTime<Utc>,
    /// Student's name, if given.
    #[serde(default, alias = "studentName", skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    /// Year level (0–8), if given.
    #[serde(default, alias = "yearLevel", skip_serializing_if = "Option::is_none")]
    pub year_level: Option<u8>,
    /// One evidence sentence per category.
    #[serde(default)]
    pub justifications: BTreeMap<Category, String>,
    /// Curriculum next steps, when a year level was given.
    #[serde(default, alias = "nextSteps", skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<NextSteps>,
}

impl Assessment {
    /// Raw total of the category scores.
    pub fn total(&self) -> u32 {
        self.scores.total()
    }
}

/// Optional details attached to an assessment.
#[derive(Debug, Clone, Default)]
pub struct AssessOptions {
    /// Student's name.
    pub student_name: Option<String>,
    /// Year level used to pick curriculum next steps.
    pub year_level: Option<u8>,
}

/// An assessment together with the figures derived for display.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AssessmentOutcome {
    /// The record to store.
    pub assessment: Assessment,
    /// Scale score for the raw total.
    pub conversion: ScaleConversion,
    /// Statistics the scores were computed from.
    pub analysis: TextAnalysis,
}

/// Score `text` and build a complete assessment record.
///
/// `chart` converts the total; `rubric` supplies the level descriptors used
/// in justifications and feedback.
#[tracing::instrument(skip_all, fields(text_len = text.len(), custom_rubric = rubric.is_custom))]
pub fn assess(
    text: &str,
    options: &AssessOptions,
    chart: &ScoringChart,
    rubric: &Rubric,
) -> AssessmentOutcome {
    let analysis = analysis::analyze(text);
    let scores = scoring::score_analysis(&analysis);
    let conversion = chart.lookup(scores.total());
    let feedback = feedback::compose_grid(&scores, &analysis, rubric);
    let justifications = justify(&analysis, &scores, rubric);
    let next_steps = options
        .year_level
        .and_then(|year| curriculum::next_steps(&scores, year));

    let timestamp = Utc::now();
    let assessment = Assessment {
        id: timestamp.timestamp_millis().to_string(),
        text: text.to_string(),
        scores,
        feedback: feedback.into(),
        timestamp,
        student_name: options.student_name.clone(),
        year_level: options.year_level,
        justifications,
        next_steps,
    };
    tracing::debug!(
        total = scores.total(),
        scale = conversion.scale_score,
        level = %conversion.curriculum_level,
        "assessment complete"
    );
    AssessmentOutcome {
        assessment,
        conversion,
        analysis,
    }
}

/// One sentence per category naming the statistics behind its score.
pub fn justify(
    a: &TextAnalysis,
    scores: &CategoryScores,
    rubric: &Rubric,
) -> BTreeMap<Category, String> {
    scores
        .iter()
        .map(|(category, score)| {
            let evidence = match category {
                Category::Ideas => format!(
                    "{} {}, {} of them distinct",
                    a.word_count,
                    plural(a.word_count, "word", "words"),
                    a.unique_words
                ),
                Category::Structure => format!(
                    "{} {}; {} of {} sentences use a comma, semicolon or colon",
                    a.paragraph_count,
                    plural(a.paragraph_count, "paragraph", "paragraphs"),
                    a.complex_sentences,
                    a.sentence_count
                ),
                Category::Organisation => format!(
                    "{} {} and {} transition {}",
                    a.paragraph_count,
                    plural(a.paragraph_count, "paragraph", "paragraphs"),
                    a.transition_words,
                    plural(a.transition_words, "word", "words")
                ),
                Category::Vocabulary => format!(
                    "vocabulary richness {:.0}% with an average word length of {:.1} characters",
                    a.vocabulary_richness, a.average_word_length
                ),
                Category::SentenceStyle => format!(
                    "average sentence length {:.1} words; {} complex {}",
                    a.average_sentence_length,
                    a.complex_sentences,
                    plural(a.complex_sentences, "sentence", "sentences")
                ),
                Category::Punctuation => {
                    format!("punctuation check scored {}/100", a.punctuation_score)
                }
                Category::Spelling => format!(
                    "{} {} longer than two letters not on the common-word list",
                    a.spelling_errors,
                    plural(a.spelling_errors, "word", "words")
                ),
            };
            let sentence = format!(
                "{} ({}): {}.",
                scoring::level_for_score(score),
                rubric.descriptor(category, score),
                evidence
            );
            (category, sentence)
        })
        .collect()
}

const fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

/// Keeps the most recent assessments.
pub trait AssessmentStore: Send + Sync {
    /// Store an assessment as the newest, evicting the oldest past the limit.
    fn save(&self, assessment: Assessment) -> StoreResult<()>;

    /// Look up an assessment by id.
    fn get(&self, id: &str) -> StoreResult<Option<Assessment>>;

    /// All retained assessments, newest first.
    fn list(&self) -> StoreResult<Vec<Assessment>>;

    /// Remove every assessment.
    fn clear(&self) -> StoreResult<()>;
}

fn push_newest(list: &mut Vec<Assessment>, assessment: Assessment) {
    list.insert(0, assessment);
    if list.len() > MAX_ASSESSMENTS {
        let evicted = list.len() - MAX_ASSESSMENTS;
        list.truncate(MAX_ASSESSMENTS);
        tracing::debug!(evicted, "oldest assessments evicted");
    }
}

/// In-process assessment store.
#[derive(Debug, Default)]
pub struct MemoryAssessmentStore {
    records: RwLock<Vec<Assessment>>,
}

impl MemoryAssessmentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssessmentStore for MemoryAssessmentStore {
    fn save(&self, assessment: Assessment) -> StoreResult<()> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        push_newest(&mut records, assessment);
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Assessment>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.iter().find(|a| a.id == id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<Assessment>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn clear(&self) -> StoreResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// Assessment store backed by a JSON array on disk.
#[derive(Debug)]
pub struct JsonFileAssessmentStore {
    path: Utf8PathBuf,
    lock: RwLock<()>,
}

impl JsonFileAssessmentStore {
    /// Store assessments at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Store assessments as [`ASSESSMENTS_FILE`] inside `data_dir`.
    pub fn in_dir(data_dir: &Utf8Path) -> Self {
        Self::new(data_dir.join(ASSESSMENTS_FILE))
    }

    /// Backing file path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_all(&self) -> StoreResult<Vec<Assessment>> {
        Ok(persist::read_json(&self.path)?.unwrap_or_default())
    }
}

impl AssessmentStore for JsonFileAssessmentStore {
    #[tracing::instrument(skip(self, assessment), fields(id = %assessment.id))]
    fn save(&self, assessment: Assessment) -> StoreResult<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read_all()?;
        push_newest(&mut records, assessment);
        persist::write_json(&self.path, &records)?;
        tracing::info!(path = %self.path, count = records.len(), "assessment saved");
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Assessment>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.into_iter().find(|a| a.id == id))
    }

    fn list(&self) -> StoreResult<Vec<Assessment>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.read_all()
    }

    #[tracing::instrument(skip(self), fields(path = %self.path))]
    fn clear(&self) -> StoreResult<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        persist::remove(&self.path)?;
        tracing::info!("assessment history cleared");
        Ok(())
    }
}
