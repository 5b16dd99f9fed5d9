//! Raw-score to scale-score conversion.
//!
//! A [`ScoringChart`] is an ascending table of total raw scores with their
//! scale score (aWs), error margin and curriculum level. Lookup is a step
//! function: totals between two rows take the lower row, and totals outside
//! the table are pinned to the first or last row while keeping the queried
//! total.

use std::ops::RangeInclusive;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Accepted total raw scores (seven categories, 1–8 each).
pub const TOTAL_SCORE_BOUNDS: RangeInclusive<u32> = 7..=56;

/// Accepted scale scores.
pub const SCALE_SCORE_BOUNDS: RangeInclusive<u32> = 700..=2500;

/// One row of a conversion chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringChartEntry {
    /// Sum of the seven category scores.
    #[serde(alias = "totalScore")]
    pub total_score: u32,
    /// Standardized scale score (aWs).
    #[serde(alias = "scaleScore")]
    pub scale_score: u32,
    /// Measurement error, reported as ±.
    #[serde(alias = "errorMargin")]
    pub error_margin: u32,
    /// Curriculum level label such as `2P` or `>6B`.
    #[serde(alias = "curriculumLevel")]
    pub curriculum_level: String,
}

impl ScoringChartEntry {
    /// Whether the row's total and scale score are within the accepted bounds.
    pub fn in_bounds(&self) -> bool {
        TOTAL_SCORE_BOUNDS.contains(&self.total_score)
            && SCALE_SCORE_BOUNDS.contains(&self.scale_score)
    }

    /// Build a row.
    pub fn new(
        total_score: u32,
        scale_score: u32,
        error_margin: u32,
        curriculum_level: impl Into<String>,
    ) -> Self {
        Self {
            total_score,
            scale_score,
            error_margin,
            curriculum_level: curriculum_level.into(),
        }
    }
}

/// Result of converting a total raw score.
pub type ScaleConversion = ScoringChartEntry;

/// A non-empty conversion table with unique, ascending, in-bounds totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawChart")]
pub struct ScoringChart {
    entries: Vec<ScoringChartEntry>,
    /// When the chart was last replaced; `None` for the built-in chart.
    pub last_updated: Option<DateTime<Utc>>,
    /// Whether this chart was supplied by the user.
    pub is_custom: bool,
}

#[derive(Deserialize, JsonSchema)]
struct RawChart {
    entries: Vec<ScoringChartEntry>,
    #[serde(default, alias = "lastUpdated")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default, alias = "isCustom")]
    is_custom: bool,
}

impl TryFrom<RawChart> for ScoringChart {
    type Error = ChartError;

    fn try_from(raw: RawChart) -> ChartResult<Self> {
        let mut chart = Self::new(raw.entries, raw.is_custom)?;
        chart.last_updated = raw.last_updated;
        Ok(chart)
    }
}

impl ScoringChart {
    /// Build a chart from rows already in ascending total-score order.
    ///
    /// Fails with [`ChartError::Empty`] for no rows,
    /// [`ChartError::OutOfBounds`] for a row outside [`TOTAL_SCORE_BOUNDS`]
    /// or [`SCALE_SCORE_BOUNDS`], and [`ChartError::Unordered`] when totals
    /// repeat or go down. Custom charts are stamped with the current time.
    pub fn new(entries: Vec<ScoringChartEntry>, is_custom: bool) -> ChartResult<Self> {
        if entries.is_empty() {
            return Err(ChartError::Empty);
        }
        if let Some(row) = entries.iter().find(|row| !row.in_bounds()) {
            return Err(ChartError::OutOfBounds {
                total_score: row.total_score,
                scale_score: row.scale_score,
            });
        }
        if let Some(pair) = entries
            .windows(2)
            .find(|w| w[0].total_score >= w[1].total_score)
        {
            return Err(ChartError::Unordered {
                previous: pair[0].total_score,
                next: pair[1].total_score,
            });
        }
        Ok(Self {
            entries,
            last_updated: is_custom.then(Utc::now),
            is_custom,
        })
    }

    /// The rows, ascending by total score.
    pub fn entries(&self) -> &[ScoringChartEntry] {
        &self.entries
    }

    /// Lowest tabulated row.
    pub fn first(&self) -> &ScoringChartEntry {
        &self.entries[0]
    }

    /// Highest tabulated row.
    pub fn last(&self) -> &ScoringChartEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Convert a total raw score.
    ///
    /// Exact matches return the row. Totals below or above the table return
    /// the first or last row with `total_score` replaced by the query. Any
    /// other total returns the greatest row at or below it.
    pub fn lookup(&self, total_score: u32) -> ScaleConversion {
        let first = self.first();
        if total_score < first.total_score {
            return ScaleConversion {
                total_score,
                ..first.clone()
            };
        }
        let last = self.last();
        if total_score > last.total_score {
            return ScaleConversion {
                total_score,
                ..last.clone()
            };
        }

        let mut closest = first;
        for entry in &self.entries {
            if entry.total_score == total_score {
                return entry.clone();
            }
            if entry.total_score <= total_score {
                closest = entry;
            }
        }
        closest.clone()
    }

    /// Whether scale scores rise strictly with total score.
    pub fn is_strictly_increasing(&self) -> bool {
        self.entries.windows(2).all(|w| {
            w[0].total_score < w[1].total_score && w[0].scale_score < w[1].scale_score
        })
    }
}

/// Built-in rows: total, scale score, error margin, level.
const DEFAULT_ROWS: [(u32, u32, u32, &str); 38] = [
    (7, 745, 134, "1B"),
    (8, 874, 121, "1B"),
    (9, 990, 112, "1P"),
    (10, 1085, 106, "1P"),
    (11, 1160, 99, "1A"),
    (12, 1218, 93, "1A"),
    (13, 1263, 88, "2B"),
    (14, 1300, 84, "2B"),
    (15, 1331, 80, "2B"),
    (16, 1358, 77, "2P"),
    (17, 1381, 74, "2P"),
    (18, 1402, 72, "2P"),
    (19, 1427, 70, "2A"),
    (20, 1461, 69, "2A"),
    (21, 1494, 68, "3B"),
    (22, 1520, 67, "3B"),
    (23, 1546, 66, "3P"),
    (24, 1571, 66, "3P"),
    (25, 1596, 66, "3A"),
    (26, 1620, 66, "3A"),
    (27, 1644, 67, "4B"),
    (28, 1668, 67, "4B"),
    (29, 1692, 68, "4P"),
    (30, 1716, 69, "4P"),
    (31, 1741, 71, "4A"),
    (32, 1766, 70, "4A"),
    (33, 1791, 73, "5B"),
    (34, 1816, 72, "5B"),
    (35, 1840, 76, "5P"),
    (36, 1863, 79, "5P"),
    (37, 1884, 84, "5A"),
    (38, 1903, 83, "5A"),
    (39, 1920, 90, "6B"),
    (40, 1935, 96, "6B"),
    (41, 1952, 103, "6B"),
    (42, 1964, 109, ">6B"),
    (43, 1975, 114, ">6B"),
    (44, 1986, 119, ">6B"),
];

static DEFAULT_CHART: LazyLock<Arc<ScoringChart>> = LazyLock::new(|| {
    Arc::new(ScoringChart {
        entries: DEFAULT_ROWS
            .iter()
            .map(|&(total, scale, margin, level)| ScoringChartEntry::new(total, scale, margin, level))
            .collect(),
        last_updated: None,
        is_custom: false,
    })
});

/// The built-in e-asTTle conversion chart (totals 7–44).
pub fn default_chart() -> Arc<ScoringChart> {
    Arc::clone(&DEFAULT_CHART)
}

/// Convert a total raw score using the built-in chart.
pub fn lookup(total_score: u32) -> ScaleConversion {
    DEFAULT_CHART.lookup(total_score)
}
