//! Error types for easttle-score-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building or importing a scoring chart.
#[derive(Error, Debug)]
pub enum ChartError {
    /// A chart must hold at least one row.
    #[error("scoring chart has no entries")]
    Empty,

    /// Rows must rise strictly by total score.
    #[error("chart row for total {next} follows total {previous}; totals must be unique and ascending")]
    Unordered {
        /// Total of the earlier row.
        previous: u32,
        /// Total of the offending row.
        next: u32,
    },

    /// A row lies outside the accepted total or scale score range.
    #[error("chart row {total_score} -> {scale_score} is outside the accepted range")]
    OutOfBounds {
        /// Total raw score of the row.
        total_score: u32,
        /// Scale score of the row.
        scale_score: u32,
    },

    /// Row data could not be decoded as a chart.
    #[error("invalid chart data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`ChartError`].
pub type ChartResult<T> = Result<T, ChartError>;

/// Errors raised while importing a rubric.
#[derive(Error, Debug)]
pub enum RubricError {
    /// Rubric data could not be decoded.
    #[error("invalid rubric data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`RubricError`].
pub type RubricResult<T> = Result<T, RubricError>;

/// Errors raised by the assessment, chart and rubric stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File that could not be accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Stored data could not be encoded or decoded.
    #[error("corrupt store data in {path}: {source}")]
    Json {
        /// File holding the bad data.
        path: Utf8PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },

    /// The platform data directory could not be determined.
    #[error("no data directory available; set `data_dir` in the configuration")]
    NoDataDir,
}

/// Result type alias using [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;
