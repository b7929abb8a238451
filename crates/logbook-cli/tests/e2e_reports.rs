//! E2E tests for the report commands:
//! `lb activities`, `lb recency`, `lb dashboard`, `lb export`.
//!
//! Every run pins the clock with `--now` and isolates the user config
//! directory so results do not depend on the host.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

const NOW: &str = "2025-01-24T10:00:00+00:00";

const SNAPSHOT: &str = r##"{
    "projects": [
        { "id": "B", "title": "Beta", "subtitle": "second", "startDate": "2025-01-01",
          "endDate": "2025-01-22", "createdAt": "2025-01-01T00:00:00Z" },
        { "id": "A", "title": "Alpha", "subtitle": "first", "startDate": "2025-01-01",
          "endDate": "2025-03-31", "createdAt": "2025-01-01T00:00:00Z" }
    ],
    "collaborators": [
        { "id": "X", "name": "Xena", "color": "#aa3355", "createdAt": "2025-01-01T00:00:00Z" },
        { "id": "Y", "name": "Yuri", "color": "#3355aa", "createdAt": "2025-01-01T00:00:00Z" }
    ],
    "activities": [
        { "id": "a4", "projectId": "B", "collaboratorId": "X", "text": "Wrap-up",
          "createdAt": "2025-01-20T09:00:00Z", "updatedAt": "2025-01-20T09:00:00Z" },
        { "id": "a2", "projectId": "A", "collaboratorId": "X", "text": "Drafting",
          "createdAt": "2025-01-12T09:00:00Z", "updatedAt": "2025-01-12T09:00:00Z" },
        { "id": "a1", "projectId": "A", "collaboratorId": "X", "text": "Kick-off",
          "createdAt": "2025-01-10T09:00:00Z", "updatedAt": "2025-01-10T09:00:00Z" },
        { "id": "a3", "projectId": "A", "collaboratorId": "X", "text": "Review",
          "createdAt": "2025-01-15T09:00:00Z", "updatedAt": "2025-01-15T09:00:00Z" }
    ]
}"##;

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("logbook.json"), SNAPSHOT).expect("write snapshot");
    std::fs::create_dir_all(dir.path().join("xdg")).expect("create config home");
    dir
}

fn lb_unpinned(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lb"));
    cmd.current_dir(dir);
    cmd.env("LOGBOOK_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env("HOME", dir);
    cmd.env_remove("FORMAT");
    cmd.env_remove("LOGBOOK_INPUT");
    cmd
}

fn lb_cmd(dir: &Path) -> Command {
    let mut cmd = lb_unpinned(dir);
    cmd.args(["--now", NOW]);
    cmd
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = lb_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("lb should not crash");
    assert!(
        output.status.success(),
        "lb {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// lb export
// ---------------------------------------------------------------------------

#[test]
fn tabular_export_merges_cells() {
    let dir = workspace();
    let doc = run_json(dir.path(), &["export", "tabular"]);

    let rows = doc["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 4);
    assert_eq!(doc["columns"][0], "PROJECTS");

    assert_eq!(rows[0]["project"]["kind"], "spanning");
    assert_eq!(rows[0]["project"]["text"], "Alpha");
    assert_eq!(rows[0]["project"]["rows"], 3);
    assert_eq!(rows[0]["collaborator"]["kind"], "spanning");
    assert_eq!(rows[0]["collaborator"]["rows"], 3);
    assert_eq!(rows[1]["collaborator"]["kind"], "covered");
    assert_eq!(rows[2]["project"]["kind"], "covered");

    assert_eq!(rows[3]["project"]["text"], "Beta");
    assert_eq!(rows[3]["project"]["rows"], 1);
    assert_eq!(rows[3]["collaborator"]["kind"], "text");
    assert_eq!(rows[3]["collaborator"]["text"], "Xena");
    assert_eq!(rows[3]["activity"], "20/01/2025 — Wrap-up");
}

#[test]
fn tabular_text_output_is_tab_separated() {
    let dir = workspace();
    lb_cmd(dir.path())
        .args(["export", "tabular", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Activity export (tabular)\n\
             Filters: period=all, project=all, collaborator=all\n\
             PROJECTS\tACTIVITIES\tCOLLABORATORS\n",
        ))
        .stdout(predicate::str::contains("Alpha\t15/01/2025 — Review\tXena\n"))
        .stdout(predicate::str::contains("\n\t12/01/2025 — Drafting\t\n"));
}

#[test]
fn editorial_bullets_match_table_rows() {
    let dir = workspace();
    let table = run_json(dir.path(), &["export", "tabular", "--period", "last7"]);
    let pages = run_json(dir.path(), &["export", "editorial", "--period", "last7"]);

    let bullets = pages["pages"]
        .as_array()
        .expect("pages array")
        .iter()
        .flat_map(|page| page["ops"].as_array().expect("ops array"))
        .filter(|op| op["role"] == "bullet")
        .count();
    assert_eq!(bullets, 1);
    assert_eq!(table["rows"].as_array().expect("rows array").len(), bullets);
    assert_eq!(
        table["filter_header"],
        "Filters: period=last7, project=all, collaborator=all"
    );
}

#[test]
fn editorial_text_output_lists_headings() {
    let dir = workspace();
    lb_cmd(dir.path())
        .args(["export", "editorial", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("── page 1 ──\nActivity export (editorial)\n"))
        .stdout(predicate::str::contains("Alpha — first\nProject period: 2025-01-01 → 2025-03-31\n  Xena\n    • 15/01/2025 — Review\n"));
}

// ---------------------------------------------------------------------------
// lb activities / recency / dashboard
// ---------------------------------------------------------------------------

#[test]
fn activities_are_newest_first_and_filtered() {
    let dir = workspace();
    let listing = run_json(dir.path(), &["activities", "--project", "A"]);
    assert_eq!(listing["total"], 3);
    let ids: Vec<&str> = listing["activities"]
        .as_array()
        .expect("activities array")
        .iter()
        .map(|a| a["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, ["a3", "a2", "a1"]);
    assert_eq!(listing["activities"][0]["project"], "Alpha");
}

#[test]
fn custom_window_is_inclusive() {
    let dir = workspace();
    let listing = run_json(dir.path(), &["activities", "--from", "2025-01-12", "--to", "2025-01-15"]);
    assert_eq!(listing["total"], 2);
    assert_eq!(
        listing["filters"],
        "Filters: period=custom, project=all, collaborator=all"
    );
}

#[test]
fn recency_reports_every_collaborator() {
    let dir = workspace();
    let listing = run_json(dir.path(), &["recency"]);
    let rows = listing["collaborators"].as_array().expect("collaborators array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Xena");
    assert_eq!(rows[0]["status"], "ok");
    assert_eq!(rows[0]["days_since"], 4);
    assert_eq!(rows[1]["name"], "Yuri");
    assert_eq!(rows[1]["status"], "no-data");
    assert!(rows[1]["last_activity"].is_null());
}

#[test]
fn recency_status_filter() {
    let dir = workspace();
    lb_cmd(dir.path())
        .args(["recency", "--status", "no-data", "--format", "text"])
        .assert()
        .success()
        .stdout("Yuri\tno-data\t-\tno activity\n");
}

#[test]
fn dashboard_cards_keep_involved_names() {
    let dir = workspace();
    let view = run_json(dir.path(), &["dashboard", "--period", "last7"]);
    let cards = view["cards"].as_array().expect("cards array");
    assert_eq!(cards.len(), 2);

    assert_eq!(cards[0]["title"], "Alpha");
    assert_eq!(cards[0]["activity_count"], 0);
    assert_eq!(cards[0]["involved"][0], "Xena");
    assert_eq!(cards[0]["closed"], false);

    assert_eq!(cards[1]["title"], "Beta");
    assert_eq!(cards[1]["closed"], true);
    assert_eq!(cards[1]["groups"][0]["name"], "Xena");
}

#[test]
fn dashboard_pretty_shows_empty_state() {
    let dir = workspace();
    lb_cmd(dir.path())
        .args(["dashboard", "--project", "A", "--period", "last7", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha — first"))
        .stdout(predicate::str::contains("No activities match the active filters."))
        .stdout(predicate::str::contains("Beta").not());
}

// ---------------------------------------------------------------------------
// Output modes and configuration
// ---------------------------------------------------------------------------

#[test]
fn format_env_selects_json() {
    let dir = workspace();
    let output = lb_cmd(dir.path())
        .env("FORMAT", "json")
        .args(["recency"])
        .output()
        .expect("lb should not crash");
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["ok_days"], 7);
}

#[test]
fn user_config_sets_output_mode() {
    let dir = workspace();
    let config_dir = dir.path().join("xdg/logbook");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(config_dir.join("config.toml"), "output = \"json\"\n").expect("write config");

    let output = lb_cmd(dir.path())
        .args(["activities"])
        .output()
        .expect("lb should not crash");
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["total"], 4);
}

#[test]
fn project_config_changes_thresholds_and_dates() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("logbook.toml"),
        "[recency]\nok_days = 2\nwarning_days = 5\n\n[dates]\nshort_format = \"%Y-%m-%d\"\n",
    )
    .expect("write config");

    let recency = run_json(dir.path(), &["recency"]);
    assert_eq!(recency["collaborators"][0]["status"], "warning");

    let listing = run_json(dir.path(), &["activities", "--limit", "1"]);
    assert_eq!(listing["activities"][0]["date"], "2025-01-20");
    assert_eq!(listing["total"], 4);
}

#[test]
fn input_flag_and_env_pick_the_snapshot() {
    let dir = workspace();
    std::fs::rename(dir.path().join("logbook.json"), dir.path().join("other.json"))
        .expect("rename snapshot");

    let listing = run_json(dir.path(), &["activities", "--input", "other.json"]);
    assert_eq!(listing["total"], 4);

    lb_cmd(dir.path())
        .env("LOGBOOK_INPUT", "other.json")
        .args(["activities", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("a4\t20/01/2025\tBeta\tXena\tWrap-up\n"));
}

#[test]
fn offsetless_timestamps_use_the_clock_offset() {
    let dir = workspace();
    let raw = r#"{
        "collaborators": [ { "id": "X", "name": "Xena", "createdAt": "2025-01-01T00:00:00" } ],
        "activities": [
            { "id": "in", "projectId": "A", "collaboratorId": "X", "text": "Last minute",
              "createdAt": "2025-01-31T23:59:59", "updatedAt": "2025-01-31T23:59:59" },
            { "id": "out", "projectId": "A", "collaboratorId": "X", "text": "Next day",
              "createdAt": "2025-02-01T00:00:00", "updatedAt": "2025-02-01T00:00:00" }
        ]
    }"#;
    std::fs::write(dir.path().join("logbook.json"), raw).expect("write snapshot");

    let output = lb_unpinned(dir.path())
        .args(["--now", "2025-03-01T12:00:00-08:00"])
        .args(["activities", "--from", "2025-01-01", "--to", "2025-01-31", "--format", "json"])
        .output()
        .expect("lb should not crash");
    assert!(output.status.success());
    let listing: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["activities"][0]["id"], "in");
    assert_eq!(listing["activities"][0]["date"], "31/01/2025");
}

#[test]
fn completions_need_no_snapshot() {
    let dir = TempDir::new().expect("temp dir");
    lb_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_lb()"));
}
