//! Building custom conversion charts from external data.
//!
//! Rows arrive either as text extracted from a published chart (lines such
//! as `7 745 134 1B`) or as a JSON list of rows. Every candidate row passes
//! the same sanity bounds, ascending sort and first-wins deduplication.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::chart::{self, ScoringChart, ScoringChartEntry};
use crate::error::ChartResult;

pub use crate::chart::{SCALE_SCORE_BOUNDS, TOTAL_SCORE_BOUNDS};

/// `<total> <scale> <margin> <level>`, level like `3P` or `>6B`.
static ROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s+([0-9]+)\s+([0-9]+)\s+(>?[1-6][BPA])").expect("valid regex")
});

/// Outcome of importing a chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartImport {
    /// The chart to activate.
    pub chart: ScoringChart,
    /// Rows that survived validation.
    pub accepted: usize,
    /// Candidate rows dropped by bounds checks or deduplication.
    pub rejected: usize,
    /// True when no rows survived and the built-in chart was returned.
    pub fell_back: bool,
}

/// Pull candidate rows out of free text.
///
/// Levels are upper-cased. Rows are returned in document order and are not
/// yet validated. Matches whose numbers overflow are skipped.
pub fn parse_rows(text: &str) -> Vec<ScoringChartEntry> {
    scan_rows(text).0
}

fn parse_row(caps: &regex::Captures<'_>) -> Option<ScoringChartEntry> {
    Some(ScoringChartEntry {
        total_score: caps[1].parse().ok()?,
        scale_score: caps[2].parse().ok()?,
        error_margin: caps[3].parse().ok()?,
        curriculum_level: caps[4].to_uppercase(),
    })
}

/// Candidate rows plus the number of matches that failed to parse.
fn scan_rows(text: &str) -> (Vec<ScoringChartEntry>, usize) {
    let mut rows = Vec::new();
    let mut unparsed = 0;
    for caps in ROW_PATTERN.captures_iter(text) {
        match parse_row(&caps) {
            Some(row) => rows.push(row),
            None => unparsed += 1,
        }
    }
    (rows, unparsed)
}

/// Drop out-of-bounds rows, sort ascending by total, keep the first row seen
/// for each total.
pub fn normalize_rows(rows: Vec<ScoringChartEntry>) -> Vec<ScoringChartEntry> {
    let mut kept: Vec<ScoringChartEntry> = rows
        .into_iter()
        .filter(ScoringChartEntry::in_bounds)
        .collect();
    // Stable, so equal totals keep input order.
    kept.sort_by_key(|row| row.total_score);

    let mut seen = HashSet::new();
    kept.retain(|row| seen.insert(row.total_score));
    kept
}

/// Build a custom chart from candidate rows.
///
/// When nothing survives validation the built-in chart is returned, marked
/// as not custom, and `fell_back` is set.
#[tracing::instrument(skip(rows), fields(candidates = rows.len()))]
pub fn import_rows(rows: Vec<ScoringChartEntry>) -> ChartImport {
    let candidates = rows.len();
    let entries = normalize_rows(rows);
    let accepted = entries.len();
    let rejected = candidates - accepted;

    match ScoringChart::new(entries, true) {
        Ok(chart) => {
            if !chart.is_strictly_increasing() {
                tracing::warn!("imported chart has scale scores that do not rise with total score");
            }
            tracing::debug!(accepted, rejected, "chart rows imported");
            ChartImport {
                chart,
                accepted,
                rejected,
                fell_back: false,
            }
        }
        Err(_) => {
            tracing::warn!(candidates, "no usable chart rows, using built-in chart");
            ChartImport {
                chart: chart::default_chart().as_ref().clone(),
                accepted: 0,
                rejected,
                fell_back: true,
            }
        }
    }
}

/// Import a chart from extracted document text.
///
/// Matches whose numbers do not fit count as rejected rows.
pub fn parse_chart_text(text: &str) -> ChartImport {
    let (rows, unparsed) = scan_rows(text);
    let mut import = import_rows(rows);
    import.rejected += unparsed;
    import
}

/// Import a chart from a JSON array of rows.
///
/// Accepts both `snake_case` and `camelCase` field names.
pub fn import_json(json: &str) -> ChartResult<ChartImport> {
    let rows: Vec<ScoringChartEntry> = serde_json::from_str(json)?;
    Ok(import_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_from_table_text() {
        let text = "Total Scale Error Level\n7 745 134 1B\n10 1085 106 1p\n44 1986 119 >6b";
        let rows = parse_rows(text);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ScoringChartEntry::new(7, 745, 134, "1B"));
        assert_eq!(rows[1].curriculum_level, "1P");
        assert_eq!(rows[2].curriculum_level, ">6B");
    }

    #[test]
    fn parses_rows_run_together_on_one_line() {
        // Text extracted from a PDF page often loses line breaks.
        let rows = parse_rows("7 745 134 1B 8 874 121 1B 9 990 112 1P");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].total_score, 9);
    }

    #[test]
    fn only_ascii_digits_and_real_levels_match() {
        // Arabic-Indic digits, then a level outside 1-6.
        let text = "\u{0667} 745 134 1B\n8 874 121 \u{0661}B\n9 990 112 7P\n10 1085 106 1P";
        assert_eq!(parse_rows(text), vec![ScoringChartEntry::new(10, 1085, 106, "1P")]);
    }

    #[test]
    fn overflowing_numbers_count_as_rejected() {
        let import = parse_chart_text("7 745 134 1B\n99999999999 874 121 1B");
        assert_eq!(import.accepted, 1);
        assert_eq!(import.rejected, 1);
        assert!(!import.fell_back);
    }

    #[test]
    fn out_of_bounds_rows_are_excluded() {
        let rows = vec![
            ScoringChartEntry::new(6, 745, 134, "1B"),
            ScoringChartEntry::new(57, 2000, 100, ">6B"),
            ScoringChartEntry::new(10, 699, 100, "1P"),
            ScoringChartEntry::new(11, 2501, 100, "1A"),
            ScoringChartEntry::new(12, 1218, 93, "1A"),
        ];
        let kept = normalize_rows(rows);
        assert_eq!(kept, vec![ScoringChartEntry::new(12, 1218, 93, "1A")]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let rows = vec![
            ScoringChartEntry::new(56, 2500, 100, ">6B"),
            ScoringChartEntry::new(7, 700, 100, "1B"),
        ];
        let kept = normalize_rows(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].total_score, 7);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let rows = vec![
            ScoringChartEntry::new(20, 1461, 69, "2A"),
            ScoringChartEntry::new(8, 874, 121, "1B"),
            ScoringChartEntry::new(20, 1999, 10, "6B"),
        ];
        let kept = normalize_rows(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].total_score, 8);
        assert_eq!(kept[1].scale_score, 1461);
    }

    #[test]
    fn import_marks_chart_custom() {
        let import = parse_chart_text("7 745 134 1B\n8 874 121 1B\n8 900 1 1P");
        assert!(!import.fell_back);
        assert!(import.chart.is_custom);
        assert!(import.chart.last_updated.is_some());
        assert_eq!(import.accepted, 2);
        assert_eq!(import.rejected, 1);
    }

    #[test]
    fn no_rows_falls_back_to_default() {
        let import = parse_chart_text("This document has no table in it.");
        assert!(import.fell_back);
        assert!(!import.chart.is_custom);
        assert_eq!(import.chart.entries().len(), 38);
    }

    #[test]
    fn all_rows_rejected_falls_back() {
        let import = parse_chart_text("3 500 10 1B");
        assert!(import.fell_back);
        assert_eq!(import.rejected, 1);
    }

    #[test]
    fn json_rows_in_either_case() {
        let json = r#"[
            {"totalScore": 9, "scaleScore": 990, "errorMargin": 112, "curriculumLevel": "1P"},
            {"total_score": 7, "scale_score": 745, "error_margin": 134, "curriculum_level": "1B"}
        ]"#;
        let import = import_json(json).unwrap();
        assert_eq!(import.accepted, 2);
        assert_eq!(import.chart.first().total_score, 7);
    }

    #[test]
    fn malformed_json_errors() {
        assert!(import_json("{not json").is_err());
    }
}
