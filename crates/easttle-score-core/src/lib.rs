//! Core library for easttle-score.
//!
//! Rule-based scoring of student writing against the seven e-asTTle
//! categories, conversion of raw totals to the aWs scale, feedback for
//! different audiences, and storage of recent assessments.
//!
//! # Modules
//!
//! - [`analysis`] - Text statistics the scorer works from
//! - [`scoring`] - Category scores and rubric levels
//! - [`chart`] / [`chart_import`] / [`chart_store`] - Scale conversion charts
//! - [`rubric`] / [`rubric_store`] - Level descriptors and rubric import
//! - [`feedback`] - Audience and depth aware feedback
//! - [`curriculum`] - Year level expectations and next steps
//! - [`assessment`] - The scoring pipeline and assessment history
//! - [`report`] - Plain-text export
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use easttle_score_core::{AssessOptions, assess, chart, rubric};
//!
//! let outcome = assess(
//!     "My dog is called Max. He runs very fast.",
//!     &AssessOptions::default(),
//!     &chart::default_chart(),
//!     &rubric::default_rubric(),
//! );
//! println!(
//!     "total {} -> {} aWs ({})",
//!     outcome.assessment.total(),
//!     outcome.conversion.scale_score,
//!     outcome.conversion.curriculum_level,
//! );
//! ```
#![deny(unsafe_code)]

pub mod analysis;
pub mod assessment;
pub mod chart;
pub mod chart_import;
pub mod chart_store;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod feedback;
mod persist;
pub mod report;
pub mod rubric;
pub mod rubric_store;
pub mod scoring;
pub mod text;
pub mod word_lists;

pub use analysis::{TextAnalysis, analyze};
pub use assessment::{
    AssessOptions, Assessment, AssessmentOutcome, AssessmentStore, JsonFileAssessmentStore,
    MemoryAssessmentStore, assess,
};
pub use chart::{ScaleConversion, ScoringChart, ScoringChartEntry};
pub use chart_import::ChartImport;
pub use chart_store::{ChartStore, FileChartStore, MemoryChartStore};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use curriculum::NextSteps;
pub use error::{
    ChartError, ChartResult, ConfigError, ConfigResult, RubricError, RubricResult, StoreError,
    StoreResult,
};
pub use feedback::{Audience, Depth, FeedbackGrid, StoredFeedback};
pub use rubric::{Rubric, RubricCategory, RubricImport};
pub use rubric_store::{FileRubricStore, MemoryRubricStore, RubricStore};
pub use scoring::{Category, CategoryScores};

/// Default input size cap (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
