//! Feedback text assembled from category scores.
//!
//! Feedback is a 3×3 grid: three audiences (student, teacher, parent) by
//! three depths (simple, standard, comprehensive). Older assessment records
//! carry other shapes; [`StoredFeedback`] reads all of them and
//! [`StoredFeedback::normalize`] turns any of them into a [`FeedbackGrid`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::TextAnalysis;
use crate::rubric::Rubric;
use crate::scoring::{self, Category, CategoryScores};

/// Who the feedback is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Audience {
    /// The child who wrote the piece.
    Student,
    /// The classroom teacher.
    #[default]
    Teacher,
    /// A parent or caregiver.
    Parent,
}

impl Audience {
    /// All audiences in grid order.
    pub const ALL: [Self; 3] = [Self::Student, Self::Teacher, Self::Parent];

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much detail the feedback carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Depth {
    /// One or two sentences.
    Simple,
    /// A short summary with strengths and growth areas.
    #[default]
    Standard,
    /// Category-by-category analysis.
    Comprehensive,
}

impl Depth {
    /// All depths in grid order.
    pub const ALL: [Self; 3] = [Self::Simple, Self::Standard, Self::Comprehensive];

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Standard => "standard",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback for one audience at every depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackSet {
    /// Short form.
    pub simple: String,
    /// Summary form.
    pub standard: String,
    /// Detailed form.
    pub comprehensive: String,
}

impl FeedbackSet {
    /// Text at the given depth.
    pub fn get(&self, depth: Depth) -> &str {
        match depth {
            Depth::Simple => &self.simple,
            Depth::Standard => &self.standard,
            Depth::Comprehensive => &self.comprehensive,
        }
    }

    fn uniform(text: &str) -> Self {
        Self {
            simple: text.to_string(),
            standard: text.to_string(),
            comprehensive: text.to_string(),
        }
    }
}

/// The canonical audience × depth feedback grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackGrid {
    /// Feedback for the student.
    pub student: FeedbackSet,
    /// Feedback for the teacher.
    pub teacher: FeedbackSet,
    /// Feedback for parents and caregivers.
    pub parent: FeedbackSet,
}

impl FeedbackGrid {
    /// Text for one cell.
    pub fn get(&self, audience: Audience, depth: Depth) -> &str {
        let set = match audience {
            Audience::Student => &self.student,
            Audience::Teacher => &self.teacher,
            Audience::Parent => &self.parent,
        };
        set.get(depth)
    }
}

/// Feedback as found in a stored assessment.
///
/// Variants are tried in declaration order when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StoredFeedback {
    /// A single block of text.
    Plain(String),
    /// The current grid shape.
    Grid(FeedbackGrid),
    /// Four audience-named strings.
    FourMode {
        /// Child-facing text.
        student: String,
        /// Teacher-facing text.
        teacher: String,
        /// Parent-facing text.
        parent: String,
        /// Formal report text.
        formal: String,
    },
    /// Three tone-named strings.
    ThreeMode {
        /// Short encouraging text.
        simple: String,
        /// Summary report text.
        report: String,
        /// Detailed analysis text.
        advanced: String,
    },
}

impl StoredFeedback {
    /// Convert any stored shape into a grid.
    ///
    /// Plain text fills every cell. The older shapes fill student cells from
    /// their child-facing text, parent cells from the parent or report text,
    /// and teacher cells from the teacher or report text, with the formal or
    /// advanced text at comprehensive depth.
    pub fn normalize(&self) -> FeedbackGrid {
        match self {
            Self::Grid(grid) => grid.clone(),
            Self::Plain(text) => FeedbackGrid {
                student: FeedbackSet::uniform(text),
                teacher: FeedbackSet::uniform(text),
                parent: FeedbackSet::uniform(text),
            },
            Self::FourMode {
                student,
                teacher,
                parent,
                formal,
            } => FeedbackGrid {
                student: FeedbackSet::uniform(student),
                teacher: FeedbackSet {
                    simple: teacher.clone(),
                    standard: teacher.clone(),
                    comprehensive: formal.clone(),
                },
                parent: FeedbackSet::uniform(parent),
            },
            Self::ThreeMode {
                simple,
                report,
                advanced,
            } => FeedbackGrid {
                student: FeedbackSet::uniform(simple),
                teacher: FeedbackSet {
                    simple: report.clone(),
                    standard: report.clone(),
                    comprehensive: advanced.clone(),
                },
                parent: FeedbackSet::uniform(report),
            },
        }
    }

    /// Text for one cell after normalisation.
    pub fn select(&self, audience: Audience, depth: Depth) -> String {
        self.normalize().get(audience, depth).to_string()
    }
}

impl From<FeedbackGrid> for StoredFeedback {
    fn from(grid: FeedbackGrid) -> Self {
        Self::Grid(grid)
    }
}

/// Compose every cell of the grid.
///
/// `analysis` is the analysis the scores came from; `rubric` supplies the
/// level descriptors quoted in parent feedback.
#[tracing::instrument(skip_all, fields(total = scores.total()))]
pub fn compose_grid(scores: &CategoryScores, analysis: &TextAnalysis, rubric: &Rubric) -> FeedbackGrid {
    let ctx = Context::new(scores, analysis, rubric);
    FeedbackGrid {
        student: FeedbackSet {
            simple: ctx.student_simple(),
            standard: ctx.student_standard(),
            comprehensive: ctx.student_comprehensive(),
        },
        teacher: FeedbackSet {
            simple: ctx.teacher_simple(),
            standard: ctx.teacher_standard(),
            comprehensive: ctx.teacher_comprehensive(),
        },
        parent: FeedbackSet {
            simple: ctx.parent_simple(),
            standard: ctx.parent_standard(),
            comprehensive: ctx.parent_comprehensive(),
        },
    }
}

/// Compose a single cell.
pub fn compose(
    scores: &CategoryScores,
    analysis: &TextAnalysis,
    rubric: &Rubric,
    audience: Audience,
    depth: Depth,
) -> String {
    let ctx = Context::new(scores, analysis, rubric);
    match (audience, depth) {
        (Audience::Student, Depth::Simple) => ctx.student_simple(),
        (Audience::Student, Depth::Standard) => ctx.student_standard(),
        (Audience::Student, Depth::Comprehensive) => ctx.student_comprehensive(),
        (Audience::Teacher, Depth::Simple) => ctx.teacher_simple(),
        (Audience::Teacher, Depth::Standard) => ctx.teacher_standard(),
        (Audience::Teacher, Depth::Comprehensive) => ctx.teacher_comprehensive(),
        (Audience::Parent, Depth::Simple) => ctx.parent_simple(),
        (Audience::Parent, Depth::Standard) => ctx.parent_standard(),
        (Audience::Parent, Depth::Comprehensive) => ctx.parent_comprehensive(),
    }
}

struct Context<'a> {
    scores: &'a CategoryScores,
    rubric: &'a Rubric,
    average: f64,
    strengths: Vec<Category>,
    growth: Vec<Category>,
    words: usize,
    sentences: usize,
}

impl<'a> Context<'a> {
    fn new(scores: &'a CategoryScores, analysis: &TextAnalysis, rubric: &'a Rubric) -> Self {
        Self {
            scores,
            rubric,
            average: scores.average(),
            strengths: scores.strengths(),
            growth: scores.growth_areas(),
            words: analysis.word_count,
            sentences: analysis.sentence_count,
        }
    }

    fn counts(&self) -> String {
        format!(
            "{} {} in {} {}",
            self.words,
            plural(self.words, "word", "words"),
            self.sentences,
            plural(self.sentences, "sentence", "sentences"),
        )
    }

    fn student_simple(&self) -> String {
        if self.average >= 6.0 {
            "Wow! Your writing is really wonderful and shows great thinking!".to_string()
        } else if self.average >= 4.0 {
            match self.strengths.first() {
                Some(top) => format!(
                    "Great work! Your {} is really good! Keep practising!",
                    lower(*top)
                ),
                None => "Nice job! Your writing is getting better and better! Keep it up!".to_string(),
            }
        } else {
            "You're doing great by practising your writing! Every story makes you better!"
                .to_string()
        }
    }

    fn student_standard(&self) -> String {
        let mut out = self.student_simple();
        if !self.strengths.is_empty() {
            out.push_str(&format!(" You did really well with your {}.", list(&self.strengths)));
        }
        if let Some(first) = self.growth.first() {
            out.push_str(&format!(" Next time, try to work on your {}.", lower(*first)));
        }
        out.push_str(" Keep writing!");
        out
    }

    fn student_comprehensive(&self) -> String {
        let lines: Vec<String> = self
            .scores
            .iter()
            .map(|(category, score)| {
                if score >= 6 {
                    format!("- Your {} is excellent!", lower(category))
                } else if score >= 4 {
                    format!("- Your {} is coming along nicely.", lower(category))
                } else {
                    format!("- Let's keep practising your {}.", lower(category))
                }
            })
            .collect();
        format!(
            "Here is how your writing went:\n{}\n\nYou wrote {}. {}",
            lines.join("\n"),
            self.counts(),
            self.student_simple()
        )
    }

    fn teacher_simple(&self) -> String {
        format!(
            "Average {:.1}/8 (total {}/56). Strengths: {}. Growth areas: {}.",
            self.average,
            self.scores.total(),
            list_or_none(&self.strengths),
            list_or_none(&self.growth),
        )
    }

    fn teacher_standard(&self) -> String {
        let mut out = String::from("Assessment Summary\n\n");

        if !self.strengths.is_empty() {
            out.push_str("Strengths:\n");
            out.push_str(&format!(
                "The student demonstrates good ability in {}. ",
                list(&self.strengths)
            ));
            if self.strengths.contains(&Category::Ideas) {
                out.push_str("Ideas are well-developed and show clear thinking. ");
            }
            if self.strengths.contains(&Category::Vocabulary) {
                out.push_str("Word choice is varied and appropriate. ");
            }
            if self.strengths.contains(&Category::Structure) {
                out.push_str("The writing is well-organized with clear structure. ");
            }
            out.push_str("\n\n");
        }

        if !self.growth.is_empty() {
            out.push_str("Areas for Growth:\n");
            out.push_str(&format!(
                "With focused practice, the student can strengthen {}. ",
                list(&self.growth)
            ));
            if self.growth.contains(&Category::Spelling) {
                out.push_str("Encourage regular spelling practice and word study. ");
            }
            if self.growth.contains(&Category::Punctuation) {
                out.push_str("Review punctuation rules and model correct usage. ");
            }
            if self.growth.contains(&Category::Organisation) {
                out.push_str(
                    "Practise planning writing with clear beginnings, middles, and endings. ",
                );
            }
            out.push_str("\n\n");
        }

        out.push_str("Next Steps:\n");
        out.push_str(
            "Continue to encourage regular writing practice and celebrate progress. \
             Focus on one or two areas at a time for improvement.",
        );
        out
    }

    fn teacher_comprehensive(&self) -> String {
        let s = self.scores;
        let mut sections = vec![String::from("Writing Analysis\n\nQuantitative Assessment:")];
        sections.extend(s.iter().map(|(category, score)| {
            format!(
                "- {category}: Level {} (Score: {score}/8)",
                scoring::level_for_score(score)
            )
        }));
        sections.push(format!("This piece has {}.\n\nQualitative Analysis:\n", self.counts()));

        let ideas = if s.ideas >= 6 {
            "The writer demonstrates sophisticated thinking with well-developed ideas that show depth and complexity."
        } else if s.ideas >= 4 {
            "Ideas are present and show developing understanding, though further elaboration would strengthen the piece."
        } else {
            "Ideas require further development. Encourage the writer to explore topics more deeply through questioning and brainstorming."
        };
        sections.push(format!("Ideas and Content: {ideas}\n"));

        let structure = if s.structure >= 6 || s.organisation >= 6 {
            "The writing exhibits strong organisational coherence with effective use of paragraphing and logical progression of ideas."
        } else {
            "Structural elements require attention. Explicit instruction in text structure and organisational frameworks would be beneficial."
        };
        sections.push(format!("Structure and Organisation: {structure}\n"));

        let language = f64::from(u16::from(s.vocabulary) + u16::from(s.sentence_style)) / 2.0;
        let language = if language >= 6.0 {
            "The writer demonstrates sophisticated control of language features, including varied vocabulary and complex sentence structures."
        } else {
            "Language use is developing. Encourage exposure to rich texts and explicit vocabulary instruction."
        };
        sections.push(format!("Language Features: {language}\n"));

        let surface = f64::from(u16::from(s.spelling) + u16::from(s.punctuation)) / 2.0;
        let surface = if surface >= 6.0 {
            "Surface features are well-controlled with accurate spelling and punctuation throughout."
        } else {
            "Surface features require attention through systematic instruction and regular editing practice."
        };
        sections.push(format!("Surface Features (Spelling and Punctuation): {surface}"));

        if !self.growth.is_empty() {
            sections.push("\nPedagogical Recommendations:".to_string());
            sections.extend(self.growth.iter().map(|area| {
                format!(
                    "- Implement targeted instruction in {} through scaffolded activities and modelled writing.",
                    lower(*area)
                )
            }));
        }
        sections.join("\n")
    }

    fn parent_simple(&self) -> String {
        if self.average >= 6.0 {
            "Your child is writing with real confidence and skill. Well done to them!".to_string()
        } else if self.average >= 4.0 {
            "Your child's writing is developing well, with clear signs of progress.".to_string()
        } else {
            "Your child is building their writing skills step by step. Regular practice at home will help."
                .to_string()
        }
    }

    fn parent_standard(&self) -> String {
        let mut out = self.parent_simple();
        if !self.strengths.is_empty() {
            out.push_str(&format!(
                " They are doing especially well with {}.",
                list(&self.strengths)
            ));
        }
        if !self.growth.is_empty() {
            out.push_str(&format!(
                " The next things to work on are {}.\n\nAt home you could:\n{}",
                list(&self.growth),
                tips(&self.growth)
            ));
        }
        out
    }

    fn parent_comprehensive(&self) -> String {
        let areas: Vec<String> = self
            .scores
            .iter()
            .map(|(category, score)| {
                format!(
                    "- {category} ({}): {}.",
                    scoring::level_for_score(score),
                    self.rubric.descriptor(category, score)
                )
            })
            .collect();
        let focus = if self.growth.is_empty() {
            self.weakest(2)
        } else {
            self.growth.clone()
        };
        format!(
            "{}\n\nHow your child did in each area:\n{}\n\nThis piece has {}.\n\nWays to help at home:\n{}",
            self.parent_simple(),
            areas.join("\n"),
            self.counts(),
            tips(&focus)
        )
    }

    fn weakest(&self, n: usize) -> Vec<Category> {
        let mut ranked: Vec<(Category, u8)> = self.scores.iter().collect();
        ranked.sort_by_key(|&(_, score)| score);
        ranked.into_iter().take(n).map(|(c, _)| c).collect()
    }
}

fn tips(areas: &[Category]) -> String {
    areas
        .iter()
        .map(|area| format!("- {}", home_tip(*area)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn home_tip(category: Category) -> &'static str {
    match category {
        Category::Ideas => "Talk about an idea together before they write it down",
        Category::Structure => "Ask them to tell you the beginning, middle and end of a story",
        Category::Organisation => "Use words like first, then and finally when retelling the day",
        Category::Vocabulary => "Read together and point out interesting new words",
        Category::SentenceStyle => "Try starting sentences in different ways when writing notes or cards",
        Category::Punctuation => "Read their writing aloud together and listen for where sentences stop",
        Category::Spelling => "Practise a few spelling words together during everyday activities",
    }
}

fn lower(category: Category) -> String {
    category.as_str().to_lowercase()
}

fn list(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| lower(*c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_or_none(categories: &[Category]) -> String {
    if categories.is_empty() {
        "none".to_string()
    } else {
        list(categories)
    }
}

const fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}
