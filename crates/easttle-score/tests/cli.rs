//! End-to-end CLI integration tests
//!
//! These tests run the compiled binary. Each stateful test works in its own
//! temp directory with a project config pointing `data_dir` inside it.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STORY: &str = "I like my cat. She is orange.";

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// A temp workspace with its own data directory and a sample story.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        fs::write(
            dir.path().join("easttle-score.toml"),
            format!("data_dir = {:?}\n", data.to_str().unwrap()),
        )
        .unwrap();
        fs::write(dir.path().join("story.txt"), STORY).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    fn cmd(&self) -> Command {
        let mut c = cmd();
        c.args(["-C", self.path().to_str().unwrap()]);
        c
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).arg("--json").output().unwrap();
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("invalid JSON output")
    }
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("assess"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn no_arguments_prints_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn long_help_lists_environment_variables() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EASTTLE_SCORE_DATA_DIR"));
}

// =============================================================================
// Info
// =============================================================================

#[test]
fn info_json_reports_package_and_data_dir() {
    let ws = Workspace::new();
    let json = ws.json(&["info"]);
    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["config"]["data_dir"], ws.data_dir().to_str().unwrap());
    assert_eq!(json["config"]["custom_chart"], false);
    assert_eq!(json["config"]["custom_rubric"], false);
}

#[test]
fn global_flags_accepted() {
    let ws = Workspace::new();
    for flags in [
        &["-q"][..],
        &["-v"],
        &["-vv"],
        &["--color", "never"],
        &["--color", "always"],
    ] {
        ws.cmd().args(flags).arg("info").assert().success();
    }
}

// =============================================================================
// Assess
// =============================================================================

#[test]
fn assess_file_prints_scores_and_conversion() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--color", "never", "assess", "story.txt", "--no-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spelling"))
        .stdout(predicate::str::contains("Total: 23/56"))
        .stdout(predicate::str::contains("1546 ± 66 aWs"))
        .stdout(predicate::str::contains("level 3P"))
        .stdout(predicate::str::contains("Feedback (teacher, standard)"));
}

#[test]
fn assess_reads_stdin() {
    let ws = Workspace::new();
    let json = ws.json(&["assess", "--no-save"]);
    // Nothing piped: empty text still scores.
    assert_eq!(json["assessment"]["scores"]["Spelling"], 8);
    assert_eq!(json["conversion"]["scale_score"], 874);

    let output = ws
        .cmd()
        .args(["assess", "-", "--no-save", "--json"])
        .write_stdin(STORY)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["conversion"]["scale_score"], 1546);
}

#[test]
fn assess_with_year_level_adds_next_steps() {
    let ws = Workspace::new();
    let json = ws.json(&[
        "assess",
        "story.txt",
        "--year",
        "2",
        "--student",
        "Mere",
        "--audience",
        "parent",
        "--depth",
        "simple",
    ]);
    let record = &json["assessment"];
    assert_eq!(record["student_name"], "Mere");
    assert_eq!(record["year_level"], 2);
    let steps = record["next_steps"]["teacher_next_steps"].as_array().unwrap();
    assert!((3..=5).contains(&steps.len()));
    assert!(json["selected_feedback"].as_str().unwrap().len() > 10);
    assert_eq!(json["saved"], true);
}

#[test]
fn assess_rejects_out_of_range_year() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["assess", "story.txt", "--year", "9"])
        .assert()
        .failure();
}

#[test]
fn assess_missing_file_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["assess", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.txt"));
}

#[test]
fn assess_respects_input_limit() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("easttle-score.toml"),
        format!(
            "data_dir = {:?}\nmax_input_bytes = 10\n",
            ws.data_dir().to_str().unwrap()
        ),
    )
    .unwrap();
    ws.cmd()
        .args(["assess", "story.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Analyze & Convert
// =============================================================================

#[test]
fn analyze_reports_statistics() {
    let ws = Workspace::new();
    let json = ws.json(&["analyze", "story.txt"]);
    assert_eq!(json["sentence_count"], 2);
    assert_eq!(json["word_count"], 7);
    assert_eq!(json["paragraph_count"], 1);
}

#[test]
fn convert_uses_builtin_chart() {
    let ws = Workspace::new();
    let json = ws.json(&["convert", "7"]);
    assert_eq!(json["scale_score"], 745);
    assert_eq!(json["curriculum_level"], "1B");

    ws.cmd()
        .args(["--color", "never", "convert", "23"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1546 ± 66 aWs, level 3P"));
}

#[test]
fn convert_below_chart_keeps_queried_total() {
    let ws = Workspace::new();
    let json = ws.json(&["convert", "3"]);
    assert_eq!(json["total_score"], 3);
    assert_eq!(json["scale_score"], 745);
}

// =============================================================================
// Chart
// =============================================================================

#[test]
fn chart_import_show_and_reset() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("chart.txt"),
        "Total Scale Error Level\n7 800 100 1B\n20 1500 70 3b\n99 3000 1 3A\n",
    )
    .unwrap();

    let summary = ws.json(&["chart", "import", "chart.txt"]);
    assert_eq!(summary["accepted"], 2);
    assert_eq!(summary["rejected"], 1);
    assert_eq!(summary["fell_back"], false);

    let chart = ws.json(&["chart", "show"]);
    assert_eq!(chart["is_custom"], true);
    assert_eq!(chart["entries"].as_array().unwrap().len(), 2);
    assert_eq!(ws.json(&["convert", "25"])["scale_score"], 1500);

    ws.cmd().args(["chart", "reset"]).assert().success();
    assert_eq!(ws.json(&["convert", "7"])["scale_score"], 745);
}

#[test]
fn chart_import_without_rows_falls_back() {
    let ws = Workspace::new();
    fs::write(ws.path().join("junk.txt"), "no table here").unwrap();
    let summary = ws.json(&["chart", "import", "junk.txt"]);
    assert_eq!(summary["fell_back"], true);
    assert_eq!(ws.json(&["chart", "show"])["is_custom"], false);
}

#[test]
fn chart_import_invalid_json_fails() {
    let ws = Workspace::new();
    fs::write(ws.path().join("rows.json"), "{not json").unwrap();
    ws.cmd()
        .args(["chart", "import", "rows.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rows.json"));
}

// =============================================================================
// Rubric
// =============================================================================

#[test]
fn rubric_import_changes_justifications_and_reset_restores() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("rubric.txt"),
        "Writing rubric\nIdeas: 1B: Seed 1P: Sprout 1A: Stem 2B: Leaf 2P: Bud 2A: Flower 3B: Fruit\n\
         Spelling: 1B: Lots 1P: Many\n",
    )
    .unwrap();

    let summary = ws.json(&["rubric", "import", "rubric.txt"]);
    assert_eq!(summary["imported"], serde_json::json!(["Ideas"]));
    assert_eq!(summary["defaulted"], serde_json::json!(["Spelling"]));
    assert_eq!(summary["fell_back"], false);

    let rubric = ws.json(&["rubric", "show"]);
    assert_eq!(rubric["is_custom"], true);
    assert_eq!(rubric["categories"][0]["descriptions"][0], "Seed");

    assert_eq!(ws.json(&["info"])["config"]["custom_rubric"], true);

    let outcome = ws.json(&["assess", "story.txt", "--no-save"]);
    assert_eq!(
        outcome["assessment"]["justifications"]["Ideas"],
        "1B (Seed): 7 words, 7 of them distinct."
    );

    ws.cmd().args(["rubric", "reset"]).assert().success();
    assert_eq!(ws.json(&["rubric", "show"])["is_custom"], false);
}

#[test]
fn rubric_show_lists_builtin_descriptors() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["rubric", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built-in rubric"))
        .stdout(predicate::str::contains("Highly sophisticated ideas"));
}

// =============================================================================
// History
// =============================================================================

#[test]
fn history_round_trip() {
    let ws = Workspace::new();
    let assessed = ws.json(&["assess", "story.txt", "--student", "Tama"]);
    let id = assessed["assessment"]["id"].as_str().unwrap().to_string();

    let list = ws.json(&["history", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["total"], 23);

    let shown = ws.json(&["history", "show", &id]);
    assert_eq!(shown["student_name"], "Tama");
    assert!(shown["feedback_grid"]["parent"]["comprehensive"].is_string());

    ws.cmd()
        .args(["history", "show", &id, "--report", "--audience", "student"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("e-asTTle Writing Assessment Results"))
        .stdout(predicate::str::contains("FEEDBACK (STUDENT, STANDARD)"));

    ws.cmd().args(["history", "clear"]).assert().success();
    assert!(ws.json(&["history", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn history_keeps_ten_newest() {
    let ws = Workspace::new();
    for _ in 0..12 {
        ws.cmd().args(["assess", "story.txt"]).assert().success();
    }
    let list = ws.json(&["history", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 10);
}

#[test]
fn history_show_unknown_id_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["history", "show", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no saved assessment with id 12345"));
}

#[test]
fn history_reads_legacy_records() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.data_dir()).unwrap();
    fs::write(
        ws.data_dir().join("assessments.json"),
        r#"[{
            "id": "1700000000000",
            "text": "Old story.",
            "scores": {"Ideas": 2, "Structure": 2, "Organisation": 2, "Vocabulary": 2,
                       "Sentence Style": 2, "Punctuation": 2, "Spelling": 2},
            "feedback": {"simple": "Short.", "report": "Report text.", "advanced": "Long."},
            "timestamp": "2023-11-14T22:13:20Z",
            "studentName": "Ana"
        }]"#,
    )
    .unwrap();

    let shown = ws.json(&["history", "show", "1700000000000"]);
    assert_eq!(shown["student_name"], "Ana");
    assert_eq!(shown["feedback_grid"]["student"]["simple"], "Short.");
    assert_eq!(shown["feedback_grid"]["teacher"]["comprehensive"], "Long.");
    assert_eq!(shown["conversion"]["total_score"], 14);
}

// =============================================================================
// Expectations
// =============================================================================

#[test]
fn expectations_for_year_level() {
    cmd()
        .args(["expectations", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase 2 - Year 5"))
        .stdout(predicate::str::contains("PUNCTUATION"));

    let output = cmd().args(["expectations", "0", "--json"]).output().unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["phase"], 1);
    assert_eq!(json["strands"].as_array().unwrap().len(), 6);
}

#[test]
fn expectations_rejects_year_nine() {
    cmd().args(["expectations", "9"]).assert().failure();
}
