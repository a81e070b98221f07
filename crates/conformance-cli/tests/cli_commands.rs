// crates/conformance-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Drives the conformance binary against an on-disk fixture.
// Purpose: Pin exit codes and console output for every command.
// Dependencies: conformance-cli binary, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Each test builds a small corpus with a config, order list, and results
//! table in a temporary directory and runs the built `conformance` binary.
//! Event logging is disabled and revision control is off so the fixture
//! needs no git checkout.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixture
// ============================================================================

const CONFIG: &str = r#"[corpus]
root = "svg"
order_file = "order.txt"
results_file = "results.csv"
vcs = "none"

[checks]
line_width = 100

[[renderers.columns]]
id = "resvg"
primary = true

[[renderers.columns]]
id = "chrome"
label = "Chrome"

[report]
output_dir = "report"

[[report.categories]]
title = "Shapes"
features = ["e-rect", "e-circle"]

[logging]
enabled = false
"#;

const DOCUMENTS: [(&str, &str); 3] = [
    ("e-rect-001.svg", "Simple rect"),
    ("e-rect-002.svg", "Rounded rect"),
    ("e-circle-001.svg", "Simple circle"),
];

fn conformance_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_conformance"))
}

fn fixture() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("svg/shapes")).unwrap();
    for (id, title) in DOCUMENTS {
        let body = format!(
            "<svg id=\"svg1\" xmlns=\"http://www.w3.org/2000/svg\">\n    \
             <title>{title}</title>\n    <rect id=\"rect1\" width=\"1\" height=\"1\"/>\n</svg>\n"
        );
        fs::write(root.join("svg/shapes").join(id), body).unwrap();
    }
    fs::write(root.join("order.txt"), "e-rect-001.svg\ne-rect-002.svg\ne-circle-001.svg\n")
        .unwrap();
    fs::write(
        root.join("results.csv"),
        "title,resvg,chrome\ne-rect-001.svg,1,1\ne-rect-002.svg,1,2\ne-circle-001.svg,1,0\n",
    )
    .unwrap();
    fs::write(root.join("conformance.toml"), CONFIG).unwrap();
    temp
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(conformance_bin())
        .args(args)
        .arg("--config")
        .arg(root.join("conformance.toml"))
        .env_remove("CONFORMANCE_LANG")
        .env_remove("CONFORMANCE_CONFIG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// ============================================================================
// SECTION: Global Flags
// ============================================================================

#[test]
fn version_flag_prints_package_version() {
    let output = Command::new(conformance_bin())
        .arg("--version")
        .env_remove("CONFORMANCE_LANG")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), format!("conformance {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn catalan_output_carries_the_disclaimer() {
    let temp = fixture();
    let output = run(temp.path(), &["--lang", "ca", "config", "validate"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("traduïda automàticament"));
    assert_eq!(stdout(&output).trim(), "Configuració vàlida.");
}

#[test]
fn invalid_language_env_is_rejected() {
    let output = Command::new(conformance_bin())
        .arg("--version")
        .env("CONFORMANCE_LANG", "xx")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("CONFORMANCE_LANG"));
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

#[test]
fn config_validate_accepts_fixture() {
    let temp = fixture();
    let output = run(temp.path(), &["config", "validate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "Config valid.");
}

#[test]
fn config_validate_reports_field_errors() {
    let temp = fixture();
    let broken = CONFIG.replace("line_width = 100", "line_width = 0");
    fs::write(temp.path().join("conformance.toml"), broken).unwrap();
    let output = run(temp.path(), &["config", "validate"]);
    assert!(!output.status.success());
    let message = stderr(&output);
    assert!(message.starts_with("Failed to load config:"), "stderr: {message}");
    assert!(message.contains("checks.line_width"));
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

#[test]
fn check_passes_on_consistent_fixture() {
    let temp = fixture();
    let output = run(temp.path(), &["check"]);
    assert!(output.status.success(), "stdout: {}", stdout(&output));
    let text = stdout(&output);
    assert!(text.starts_with("Checked 3 documents"));
    assert!(text.contains("All checks passed."));
}

#[test]
fn check_fails_when_a_document_is_removed() {
    let temp = fixture();
    fs::remove_file(temp.path().join("svg/shapes/e-rect-002.svg")).unwrap();
    let output = run(temp.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("1 violation(s) found:"), "stdout: {text}");
    assert!(text.contains("[order_sync]"));
    assert!(text.contains("e-rect-002.svg"));
}

#[test]
fn check_json_output_is_structured() {
    let temp = fixture();
    let output = run(temp.path(), &["check", "--format", "json"]);
    assert!(output.status.success());
    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "pass");
    assert_eq!(report["cases_checked"], 3);
    assert!(report["checks_skipped"].as_array().unwrap().contains(&Value::from("untracked_files")));
}

#[test]
fn malformed_outcome_code_is_fatal() {
    let temp = fixture();
    fs::write(
        temp.path().join("results.csv"),
        "title,resvg,chrome\ne-rect-001.svg,1,7\ne-rect-002.svg,1,2\ne-circle-001.svg,1,0\n",
    )
    .unwrap();
    let output = run(temp.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).starts_with("Failed to read results:"));
}

// ============================================================================
// SECTION: Report Commands
// ============================================================================

#[test]
fn report_writes_then_verifies() {
    let temp = fixture();
    let written = run(temp.path(), &["report"]);
    assert!(written.status.success(), "stderr: {}", stderr(&written));
    assert!(stdout(&written).contains("3 artifacts"));
    for name in ["index.json", "stats.json", "summary.json", "summary.md"] {
        assert!(temp.path().join("report").join(name).is_file(), "missing {name}");
    }

    let verified = run(temp.path(), &["report", "--verify"]);
    assert!(verified.status.success(), "stderr: {}", stderr(&verified));
    assert!(stdout(&verified).contains("matches the current results"));

    fs::write(temp.path().join("report/summary.md"), "edited\n").unwrap();
    let drifted = run(temp.path(), &["report", "--verify"]);
    assert_eq!(drifted.status.code(), Some(1));
    assert!(stderr(&drifted).contains("artifact size mismatch: summary.md"));
}

#[test]
fn report_verify_detects_same_length_edit() {
    let temp = fixture();
    let written = run(temp.path(), &["report"]);
    assert!(written.status.success(), "stderr: {}", stderr(&written));

    let path = temp.path().join("report/summary.md");
    let original = fs::read_to_string(&path).unwrap();
    let edited = original.replacen("resvg", "RESVG", 1);
    assert_ne!(edited, original);
    assert_eq!(edited.len(), original.len());
    fs::write(&path, edited).unwrap();

    let drifted = run(temp.path(), &["report", "--verify"]);
    assert_eq!(drifted.status.code(), Some(1));
    let message = stderr(&drifted);
    assert!(message.contains("artifact mismatch: summary.md"), "stderr: {message}");
    assert!(!message.contains("size mismatch"));
}

#[test]
fn report_honors_output_dir_override() {
    let temp = fixture();
    let target = temp.path().join("elsewhere");
    let output = run(temp.path(), &["report", "--output-dir", target.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(target.join("summary.md").is_file());
    assert!(!temp.path().join("report").exists());
}

#[test]
fn summary_text_lists_rollups_in_layout_order() {
    let temp = fixture();
    let output = run(temp.path(), &["summary"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines[0], "2 features, 3 tests");
    assert_eq!(lines[1], "Shapes");
    assert_eq!(lines[2], "  e-rect: resvg passed 2/2, chrome partial 1/2");
    assert_eq!(lines[3], "  e-circle: resvg passed 1/1, chrome passed 1/1");
}

#[test]
fn summary_json_matches_tree_shape() {
    let temp = fixture();
    let output = run(temp.path(), &["summary", "--format", "json"]);
    assert!(output.status.success());
    let tree: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(tree["schema_version"], 1);
    assert_eq!(tree["renderers"][0]["id"], "resvg");
    assert_eq!(tree["categories"][0]["features"][0]["feature_key"], "e-rect");
}

#[test]
fn stats_prints_pass_counts() {
    let temp = fixture();
    let output = run(temp.path(), &["stats"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stats: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["renderers"][0]["renderer"], "resvg");
    assert_eq!(stats["renderers"][0]["passed"], 3);
    assert_eq!(stats["renderers"][1]["label"], "Chrome");
    assert_eq!(stats["renderers"][1]["passed"], 1);
}

// ============================================================================
// SECTION: Outline and Results Commands
// ============================================================================

#[test]
fn outline_filters_by_feature() {
    let temp = fixture();
    let output = run(temp.path(), &["outline", "--feature", "e-rect"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "e-rect-001.svg  Simple rect\ne-rect-002.svg  Rounded rect\n"
    );
}

#[test]
fn outline_rejects_malformed_feature_key() {
    let temp = fixture();
    let output = run(temp.path(), &["outline", "--feature", "rect"]);
    assert!(!output.status.success());
}

#[test]
fn results_sync_follows_order_list() {
    let temp = fixture();
    fs::write(temp.path().join("order.txt"), "e-circle-001.svg\ne-circle-002.svg\ne-rect-001.svg\n")
        .unwrap();
    let target = temp.path().join("synced.csv");
    let output = run(temp.path(), &["results", "sync", "--output", target.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(3 rows)"));
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "title,resvg,chrome\ne-circle-001.svg,1,0\ne-circle-002.svg,0,0\ne-rect-001.svg,1,1\n"
    );
}
