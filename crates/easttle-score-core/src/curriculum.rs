//! New Zealand Curriculum writing expectations for Years 0–8 and the
//! next steps derived from them.
//!
//! Each year level lists, per strand, what a writer at that year usually
//! does and three teaching next steps. Years group into phases: phase 1
//! covers Years 0–3, phase 2 Years 4–6 and phase 3 Years 7–8.

use std::cmp::Reverse;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scoring::{Category, CategoryScores};

/// Highest year level with curriculum data.
pub const MAX_YEAR_LEVEL: u8 = 8;

/// A curriculum strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    /// Ideas and content.
    Ideas,
    /// Text structure and organisation.
    Structure,
    /// Vocabulary and language features.
    Language,
    /// Sentence construction.
    Sentences,
    /// Spelling.
    Spelling,
    /// Punctuation.
    Punctuation,
}

impl Strand {
    /// All strands in curriculum order.
    pub const ALL: [Self; 6] = [
        Self::Ideas,
        Self::Structure,
        Self::Language,
        Self::Sentences,
        Self::Spelling,
        Self::Punctuation,
    ];

    /// The strand a rubric category is taught under.
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::Ideas => Self::Ideas,
            Category::Structure | Category::Organisation => Self::Structure,
            Category::Vocabulary => Self::Language,
            Category::SentenceStyle => Self::Sentences,
            Category::Punctuation => Self::Punctuation,
            Category::Spelling => Self::Spelling,
        }
    }

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ideas => "ideas",
            Self::Structure => "structure",
            Self::Language => "language",
            Self::Sentences => "sentences",
            Self::Spelling => "spelling",
            Self::Punctuation => "punctuation",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Ideas => 0,
            Self::Structure => 1,
            Self::Language => 2,
            Self::Sentences => 3,
            Self::Spelling => 4,
            Self::Punctuation => 5,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a writer at a year level usually does in one strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    /// Typical current behaviour.
    pub current: &'static str,
    /// Teaching next steps, most immediate first.
    pub next_steps: [&'static str; 3],
}

/// Expectations for one year level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCurriculum {
    /// Year level, 0–8.
    pub year_level: u8,
    strands: [Expectation; 6],
}

impl YearCurriculum {
    /// Curriculum phase (1, 2 or 3).
    pub const fn phase(&self) -> u8 {
        match phase_for_year(self.year_level) {
            Some(phase) => phase,
            None => 3,
        }
    }

    /// Expectation for a strand.
    pub const fn strand(&self, strand: Strand) -> &Expectation {
        &self.strands[strand.index()]
    }

    /// Render the expectations as a plain-text block.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "NZC English Phase {} - Year {} expectations\n",
            self.phase(),
            self.year_level
        );
        for strand in Strand::ALL {
            let e = self.strand(strand);
            out.push_str(&format!(
                "\n{}:\n- Current expectation: {}\n- Next steps: {}\n",
                strand.as_str().to_uppercase(),
                e.current,
                e.next_steps.join("; ")
            ));
        }
        out
    }
}

/// Next steps generated for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NextSteps {
    /// Three to five teaching next steps.
    #[serde(alias = "teacherNextSteps")]
    pub teacher_next_steps: Vec<String>,
    /// One child-friendly sentence for the writing book.
    #[serde(alias = "studentBookFeedback")]
    pub student_book_feedback: String,
}

/// Curriculum phase for a year level, `None` above Year 8.
pub const fn phase_for_year(year_level: u8) -> Option<u8> {
    match year_level {
        0..=3 => Some(1),
        4..=6 => Some(2),
        7..=8 => Some(3),
        _ => None,
    }
}

/// Expectations for a year level, `None` above Year 8.
pub fn curriculum_for_year(year_level: u8) -> Option<&'static YearCurriculum> {
    CURRICULUM.get(usize::from(year_level))
}

/// Typical year of schooling for a curriculum level, e.g. `2P` → "Year 3-4 expected".
pub fn year_expectation(level: &str) -> Option<&'static str> {
    let phrase = match level.trim().to_ascii_uppercase().as_str() {
        "1B" => "Year 1 beginning",
        "1P" => "Year 1-2 expected",
        "1A" => "Year 2 expected",
        "2B" => "Year 2-3 expected",
        "2P" => "Year 3-4 expected",
        "2A" => "Year 4 expected",
        "3B" => "Year 4-5 expected",
        "3P" => "Year 5-6 expected",
        "3A" => "Year 6 expected",
        "4B" => "Year 6-7 expected",
        "4P" => "Year 7-8 expected",
        "4A" => "Year 8 expected",
        "5B" => "Year 8-9 expected",
        "5P" => "Year 9-10 expected",
        "5A" => "Year 10 expected",
        "6B" => "Year 10-11 expected",
        ">6B" => "Above Year 11",
        _ => return None,
    };
    Some(phrase)
}

/// Pick teaching next steps for the weakest strands at a year level.
///
/// Strands are ranked by their lowest category score (ties keep curriculum
/// order). The three weakest each give their first next step, and any of
/// them scoring 3 or less also gives its second, for three to five steps.
/// Returns `None` when the year level has no curriculum data.
#[tracing::instrument(skip(scores))]
pub fn next_steps(scores: &CategoryScores, year_level: u8) -> Option<NextSteps> {
    let year = curriculum_for_year(year_level)?;

    let mut strand_scores: Vec<(Strand, u8)> = Strand::ALL
        .iter()
        .map(|&strand| {
            let score = scores
                .iter()
                .filter(|&(c, _)| Strand::for_category(c) == strand)
                .map(|(_, s)| s)
                .min()
                .unwrap_or(0);
            (strand, score)
        })
        .collect();
    strand_scores.sort_by_key(|&(_, score)| score);

    let focus = &strand_scores[..3];
    let mut steps: Vec<String> = focus
        .iter()
        .map(|&(strand, _)| year.strand(strand).next_steps[0].to_string())
        .collect();
    for &(strand, score) in focus {
        if steps.len() >= 5 {
            break;
        }
        if score <= 3 {
            steps.push(year.strand(strand).next_steps[1].to_string());
        }
    }

    let (weakest, _) = strand_scores[0];
    let strongest = scores
        .iter()
        .min_by_key(|&(_, s)| Reverse(s))
        .map(|(c, _)| c)
        .unwrap_or(Category::Ideas);
    let student_book_feedback = format!(
        "Great job with your {}! Next time, try to {}.",
        strongest.as_str().to_lowercase(),
        lowercase_first(year.strand(weakest).next_steps[0])
    );

    tracing::debug!(year_level, steps = steps.len(), "next steps selected");
    Some(NextSteps {
        teacher_next_steps: steps,
        student_book_feedback,
    })
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

const fn e(current: &'static str, next_steps: [&'static str; 3]) -> Expectation {
    Expectation {
        current,
        next_steps,
    }
}

static CURRICULUM: [YearCurriculum; 9] = [
    YearCurriculum {
        year_level: 0,
        strands: [
            e(
                "Draws pictures and uses some letters/words to record ideas",
                [
                    "Write a simple sentence about their picture",
                    "Add more detail to ideas through talking before writing",
                    "Use personal experiences as topics for writing",
                ],
            ),
            e(
                "Creates simple texts (labels, captions, lists)",
                [
                    "Write simple recounts with a beginning",
                    "Include 2-3 related ideas in sequence",
                    "Use \"I\" statements to tell about themselves",
                ],
            ),
            e(
                "Uses familiar oral vocabulary in writing",
                [
                    "Stretch vocabulary beyond everyday words",
                    "Use describing words (adjectives) like colours and sizes",
                    "Include action words (verbs) in sentences",
                ],
            ),
            e(
                "Attempts simple sentences with support",
                [
                    "Write complete sentences with subject and verb",
                    "Start sentences with \"I\", \"The\", \"My\"",
                    "Use \"and\" to join two ideas",
                ],
            ),
            e(
                "Uses beginning sounds and some sight words",
                [
                    "Spell high-frequency words correctly (I, a, the, is, to, and)",
                    "Use initial and final sounds in unknown words",
                    "Write CVC words phonetically (cat, dog, run)",
                ],
            ),
            e(
                "Beginning to understand spaces between words",
                [
                    "Use finger spaces between words",
                    "Start sentences with a capital letter",
                    "Put a full stop at the end of a sentence",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 1,
        strands: [
            e(
                "Writes about personal experiences with some detail",
                [
                    "Add more specific details (who, what, where)",
                    "Include feelings or reactions in writing",
                    "Develop one main idea with supporting details",
                ],
            ),
            e(
                "Creates simple texts with a beginning and end",
                [
                    "Write texts with a clear beginning, middle, and end",
                    "Use time connectives (first, then, next, finally)",
                    "Keep ideas in logical order",
                ],
            ),
            e(
                "Uses simple describing words and verbs",
                [
                    "Use more specific nouns (golden retriever vs dog)",
                    "Add adverbs to describe actions (ran quickly)",
                    "Include dialogue in stories",
                ],
            ),
            e(
                "Writes simple and compound sentences using \"and\"",
                [
                    "Vary sentence beginnings (not always \"I\" or \"The\")",
                    "Use \"but\" and \"so\" to join sentences",
                    "Write sentences of different lengths",
                ],
            ),
            e(
                "Spells common words correctly, uses phonetic spelling for others",
                [
                    "Spell Essential List 1 words correctly",
                    "Use common spelling patterns (-ing, -ed, -er)",
                    "Check and fix spelling using word cards",
                ],
            ),
            e(
                "Uses capital letters and full stops with some consistency",
                [
                    "Use capital letters for names and \"I\"",
                    "Use question marks for questions",
                    "Use commas in lists (red, blue and green)",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 2,
        strands: [
            e(
                "Develops ideas with relevant details and some elaboration",
                [
                    "Show not tell (describe feelings through actions)",
                    "Add sensory details (what they saw, heard, felt)",
                    "Include interesting or surprising details",
                ],
            ),
            e(
                "Writes texts with clear beginning, middle, and end",
                [
                    "Create an engaging opening that hooks the reader",
                    "Build tension or interest in the middle",
                    "Write satisfying endings that connect to the beginning",
                ],
            ),
            e(
                "Uses varied vocabulary including adjectives and adverbs",
                [
                    "Choose precise words for effect",
                    "Use similes (as fast as lightning)",
                    "Include technical vocabulary for the topic",
                ],
            ),
            e(
                "Writes compound sentences with connectives",
                [
                    "Use complex sentences with \"because\", \"when\", \"if\"",
                    "Start sentences in different ways for effect",
                    "Use short sentences for impact",
                ],
            ),
            e(
                "Spells most common words correctly",
                [
                    "Spell Essential List 2 words correctly",
                    "Use spelling strategies (look-cover-write-check)",
                    "Apply common spelling rules (-tion, doubling consonants)",
                ],
            ),
            e(
                "Uses basic punctuation consistently",
                [
                    "Use speech marks for dialogue correctly",
                    "Use apostrophes for contractions (don't, can't)",
                    "Use exclamation marks for effect",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 3,
        strands: [
            e(
                "Develops and elaborates ideas with relevant details",
                [
                    "Develop character through actions, dialogue, and thoughts",
                    "Create atmosphere through descriptive detail",
                    "Use examples and evidence to support main ideas",
                ],
            ),
            e(
                "Organises texts with paragraphs or sections",
                [
                    "Use topic sentences to introduce paragraphs",
                    "Link paragraphs with transition words",
                    "Plan and organise ideas before writing",
                ],
            ),
            e(
                "Uses precise vocabulary and some figurative language",
                [
                    "Use metaphors for effect",
                    "Choose vocabulary to create mood",
                    "Use personification and onomatopoeia",
                ],
            ),
            e(
                "Uses a variety of sentence structures",
                [
                    "Use sentence variety deliberately for effect",
                    "Start sentences with adverbs or phrases",
                    "Use relative clauses (who, which, that)",
                ],
            ),
            e(
                "Spells most words correctly including some complex words",
                [
                    "Spell Essential List 3 words correctly",
                    "Proofread and edit for spelling errors",
                    "Use dictionary and spell-check tools",
                ],
            ),
            e(
                "Uses a range of punctuation correctly",
                [
                    "Use commas in complex sentences",
                    "Punctuate dialogue with new lines",
                    "Use apostrophes for possession (the dog's tail)",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 4,
        strands: [
            e(
                "Develops ideas with supporting detail and some elaboration across the text",
                [
                    "Develop ideas with increasing depth and insight",
                    "Use specific examples and evidence to support arguments",
                    "Create well-developed characters with motivations",
                ],
            ),
            e(
                "Organises ideas into paragraphs with clear topic sentences",
                [
                    "Use a range of text structures for different purposes",
                    "Create effective introductions that set context",
                    "Write conclusions that summarise or reflect",
                ],
            ),
            e(
                "Uses a range of vocabulary including subject-specific words",
                [
                    "Use vocabulary deliberately to influence the reader",
                    "Include technical and academic vocabulary",
                    "Use figurative language with intention",
                ],
            ),
            e(
                "Writes complex sentences with subordinate clauses",
                [
                    "Vary sentence structure for rhythm and emphasis",
                    "Use passive voice when appropriate",
                    "Control sentence length for effect",
                ],
            ),
            e(
                "Spells most words correctly including subject-specific vocabulary",
                [
                    "Spell Essential List 4 words correctly",
                    "Apply spelling rules for prefixes and suffixes",
                    "Use etymology to help with spelling",
                ],
            ),
            e(
                "Uses a range of punctuation including speech marks and apostrophes",
                [
                    "Use colons to introduce lists or explanations",
                    "Use semicolons to join related ideas",
                    "Use dashes and brackets for parenthesis",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 5,
        strands: [
            e(
                "Develops and sustains ideas with depth and insight",
                [
                    "Integrate multiple perspectives or viewpoints",
                    "Use abstract ideas alongside concrete examples",
                    "Develop themes consistently across the text",
                ],
            ),
            e(
                "Controls structure across a range of text types",
                [
                    "Manipulate structure for deliberate effect",
                    "Use flashback, flash-forward, or non-linear structures",
                    "Balance narrative and descriptive elements",
                ],
            ),
            e(
                "Selects vocabulary for precision and effect",
                [
                    "Use connotation and nuance in word choice",
                    "Develop a personal voice and style",
                    "Adapt register for different audiences",
                ],
            ),
            e(
                "Controls a variety of sentence structures",
                [
                    "Use rhetorical devices (repetition, tripling)",
                    "Vary syntax for emphasis and rhythm",
                    "Use fragments and minor sentences intentionally",
                ],
            ),
            e(
                "Spells accurately including complex and technical words",
                [
                    "Spell Essential List 5 words correctly",
                    "Use morphology to spell unfamiliar words",
                    "Proofread systematically for errors",
                ],
            ),
            e(
                "Uses punctuation accurately for clarity and effect",
                [
                    "Use punctuation to control pace and emphasis",
                    "Use ellipsis for effect",
                    "Punctuate complex dialogue exchanges",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 6,
        strands: [
            e(
                "Develops sophisticated ideas with complexity and nuance",
                [
                    "Explore ambiguity and multiple interpretations",
                    "Use symbolism and extended metaphor",
                    "Develop original and creative perspectives",
                ],
            ),
            e(
                "Uses structure confidently across text types",
                [
                    "Subvert or experiment with genre conventions",
                    "Control pacing and tension effectively",
                    "Use structural devices for thematic effect",
                ],
            ),
            e(
                "Uses sophisticated vocabulary with precision",
                [
                    "Develop distinctive authorial voice",
                    "Use language to challenge or provoke",
                    "Master formal and informal registers",
                ],
            ),
            e(
                "Uses sophisticated sentence structures with control",
                [
                    "Use syntax to mirror meaning",
                    "Master complex multi-clause sentences",
                    "Use sentence patterns for stylistic effect",
                ],
            ),
            e(
                "Spells accurately across all word types",
                [
                    "Spell Essential List 6 words correctly",
                    "Maintain accuracy under pressure",
                    "Use a range of strategies independently",
                ],
            ),
            e(
                "Uses the full range of punctuation confidently",
                [
                    "Use punctuation for subtle effects",
                    "Master all apostrophe uses",
                    "Punctuate for voice and rhythm",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 7,
        strands: [
            e(
                "Develops complex ideas with insight and originality",
                [
                    "Synthesise ideas from multiple sources",
                    "Develop sustained and cohesive arguments",
                    "Explore sophisticated themes with maturity",
                ],
            ),
            e(
                "Controls structure with sophistication across genres",
                [
                    "Integrate multiple text types within a single piece",
                    "Use structure to convey meaning and theme",
                    "Master transitions between sections and ideas",
                ],
            ),
            e(
                "Uses language with sophistication and flair",
                [
                    "Develop a mature and distinctive voice",
                    "Use language to create layers of meaning",
                    "Adapt style for different purposes and contexts",
                ],
            ),
            e(
                "Uses varied and sophisticated syntax",
                [
                    "Use syntax to create rhythm and flow",
                    "Master embedding and layering of clauses",
                    "Use grammatical choices for stylistic effect",
                ],
            ),
            e(
                "Spells accurately including specialised vocabulary",
                [
                    "Spell Essential List 7 words correctly",
                    "Master subject-specific terminology",
                    "Edit for accuracy in final drafts",
                ],
            ),
            e(
                "Uses punctuation with sophistication",
                [
                    "Use punctuation to enhance meaning and voice",
                    "Master all advanced punctuation conventions",
                    "Use punctuation creatively within conventions",
                ],
            ),
        ],
    },
    YearCurriculum {
        year_level: 8,
        strands: [
            e(
                "Develops ideas with maturity, depth, and intellectual rigour",
                [
                    "Engage critically with complex concepts",
                    "Develop original and thought-provoking perspectives",
                    "Sustain sophisticated ideas across extended texts",
                ],
            ),
            e(
                "Masters structure across all text types",
                [
                    "Experiment with innovative structural approaches",
                    "Use structure to enhance thematic complexity",
                    "Control extended and multi-part texts",
                ],
            ),
            e(
                "Uses language with precision, power, and originality",
                [
                    "Develop a compelling and authentic voice",
                    "Use language to challenge and engage readers",
                    "Master the nuances of formal academic writing",
                ],
            ),
            e(
                "Masters sentence variety and control",
                [
                    "Use syntax with conscious artistry",
                    "Control complex grammatical structures",
                    "Adapt sentence style for genre and purpose",
                ],
            ),
            e(
                "Spells accurately across all contexts",
                [
                    "Spell Essential List 8 words correctly",
                    "Maintain accuracy in extended writing",
                    "Use spelling knowledge to learn new words",
                ],
            ),
            e(
                "Masters all punctuation conventions",
                [
                    "Use punctuation as a tool for expression",
                    "Maintain consistency and accuracy throughout",
                    "Apply conventions to new and complex situations",
                ],
            ),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [u8; 7]) -> CategoryScores {
        CategoryScores {
            ideas: values[0],
            structure: values[1],
            organisation: values[2],
            vocabulary: values[3],
            sentence_style: values[4],
            punctuation: values[5],
            spelling: values[6],
        }
    }

    #[test]
    fn phases_cover_years() {
        assert_eq!(phase_for_year(0), Some(1));
        assert_eq!(phase_for_year(3), Some(1));
        assert_eq!(phase_for_year(4), Some(2));
        assert_eq!(phase_for_year(6), Some(2));
        assert_eq!(phase_for_year(7), Some(3));
        assert_eq!(phase_for_year(8), Some(3));
        assert_eq!(phase_for_year(9), None);
    }

    #[test]
    fn curriculum_is_indexed_by_year() {
        for year in 0..=MAX_YEAR_LEVEL {
            let c = curriculum_for_year(year).unwrap();
            assert_eq!(c.year_level, year);
        }
        assert!(curriculum_for_year(9).is_none());
    }

    #[test]
    fn year_expectations() {
        assert_eq!(year_expectation("1B"), Some("Year 1 beginning"));
        assert_eq!(year_expectation("2p"), Some("Year 3-4 expected"));
        assert_eq!(year_expectation(">6B"), Some("Above Year 11"));
        assert_eq!(year_expectation("7A"), None);
    }

    #[test]
    fn organisation_is_taught_under_structure() {
        assert_eq!(Strand::for_category(Category::Organisation), Strand::Structure);
        assert_eq!(Strand::for_category(Category::Vocabulary), Strand::Language);
        assert_eq!(Strand::for_category(Category::SentenceStyle), Strand::Sentences);
    }

    #[test]
    fn low_scores_give_five_steps() {
        let s = scores([0, 2, 1, 6, 0, 6, 8]);
        let steps = next_steps(&s, 1).unwrap();
        // ideas 0, sentences 0, structure 1, all at or below 3
        assert_eq!(steps.teacher_next_steps.len(), 5);
        assert_eq!(steps.teacher_next_steps[0], "Add more specific details (who, what, where)");
        assert_eq!(steps.teacher_next_steps[1], "Vary sentence beginnings (not always \"I\" or \"The\")");
        assert_eq!(
            steps.teacher_next_steps[2],
            "Write texts with a clear beginning, middle, and end"
        );
        assert_eq!(
            steps.student_book_feedback,
            "Great job with your spelling! Next time, try to add more specific details (who, what, where)."
        );
    }

    #[test]
    fn strong_scores_give_three_steps() {
        let s = scores([7, 6, 8, 7, 6, 7, 8]);
        let steps = next_steps(&s, 5).unwrap();
        assert_eq!(steps.teacher_next_steps.len(), 3);
        assert!(steps.student_book_feedback.starts_with("Great job with your organisation!"));
    }

    #[test]
    fn step_count_always_in_range() {
        for year in 0..=MAX_YEAR_LEVEL {
            for v in 0..=8 {
                let s = scores([v, 8 - v, v, 8 - v, v / 2, v, 8]);
                let steps = next_steps(&s, year).unwrap();
                let n = steps.teacher_next_steps.len();
                assert!((3..=5).contains(&n), "year {year} v {v}: {n}");
            }
        }
    }

    #[test]
    fn unknown_year_has_no_steps() {
        assert!(next_steps(&scores([4; 7]), 12).is_none());
    }

    #[test]
    fn summary_names_phase_and_strands() {
        let text = curriculum_for_year(4).unwrap().summary();
        assert!(text.starts_with("NZC English Phase 2 - Year 4 expectations"));
        assert!(text.contains("PUNCTUATION:"));
        assert!(text.contains("Use semicolons to join related ideas"));
    }

    #[test]
    fn next_steps_read_camel_case() {
        let json = r#"{"teacherNextSteps": ["a", "b", "c"], "studentBookFeedback": "Well done"}"#;
        let steps: NextSteps = serde_json::from_str(json).unwrap();
        assert_eq!(steps.teacher_next_steps.len(), 3);
    }
}
