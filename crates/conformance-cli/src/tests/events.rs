// crates/conformance-cli/src/tests/events.rs
// ============================================================================
// Module: Run Event Tests
// Description: Event summaries and sink behavior.
// Purpose: Pin the JSON-line event shape and append semantics.
// Dependencies: conformance-cli events module, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Check events count violations per check label; the file sink appends one
//! JSON object per line and keeps earlier lines.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only event assertions."
)]

use std::fs;

use conformance_core::CheckKind;
use conformance_core::CheckReport;
use conformance_core::CheckStatus;
use conformance_core::DEFAULT_HASH_ALGORITHM;
use conformance_core::HashDigest;
use conformance_core::TestId;
use conformance_core::Violation;
use serde_json::Value;

use crate::events::CheckRunEvent;
use crate::events::EventSink;
use crate::events::FileEventSink;
use crate::events::ReportWrittenEvent;
use crate::events::open_event_sink;

fn failing_report() -> CheckReport {
    CheckReport {
        status: CheckStatus::Fail,
        cases_checked: 3,
        checks_run: vec![CheckKind::TestIds, CheckKind::Titles, CheckKind::OrderSync],
        checks_skipped: vec![CheckKind::UntrackedFiles],
        violations: vec![
            Violation::EmptyTitle {
                file: "shapes/e-rect-001.svg".to_string(),
            },
            Violation::EmptyTitle {
                file: "shapes/e-rect-002.svg".to_string(),
            },
            Violation::DuplicateOrderEntry {
                id: TestId::new("e-rect-001.svg"),
            },
        ],
    }
}

#[test]
fn check_event_counts_violations_per_check() {
    let event = CheckRunEvent::from_report(&failing_report());
    assert_eq!(event.event, "check_run");
    assert_eq!(event.cases_checked, 3);
    assert_eq!(event.checks_run, 3);
    assert_eq!(event.checks_skipped, 1);
    assert_eq!(event.violations.get("titles"), Some(&2));
    assert_eq!(event.violations.get("order_sync"), Some(&1));
    assert_eq!(event.violations.len(), 2);
    assert_eq!(event.status, CheckStatus::Fail);
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    fs::write(&path, "{\"event\":\"earlier\"}\n").unwrap();

    let sink = FileEventSink::new(&path).unwrap();
    sink.record_check_run(&CheckRunEvent::from_report(&failing_report()));
    let digest = HashDigest::new(DEFAULT_HASH_ALGORITHM, &[0xab; 32]);
    sink.record_report_written(&ReportWrittenEvent::new(dir.path(), digest, 4, 9, false));

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], "earlier");
    assert_eq!(lines[1]["event"], "check_run");
    assert_eq!(lines[1]["status"], "fail");
    assert_eq!(lines[2]["event"], "report_written");
    assert_eq!(lines[2]["feature_count"], 4);
    assert_eq!(lines[2]["test_count"], 9);
    assert_eq!(lines[2]["verified"], false);
    assert_eq!(lines[2]["summary_digest"]["algorithm"], "sha256");
}

#[test]
fn disabled_logging_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let sink = open_event_sink(false, Some(&path)).unwrap();
    sink.record_check_run(&CheckRunEvent::from_report(&failing_report()));
    assert!(!path.exists());
}

#[test]
fn enabled_logging_with_path_creates_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let sink = open_event_sink(true, Some(&path)).unwrap();
    sink.record_check_run(&CheckRunEvent::from_report(&failing_report()));
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[test]
fn unwritable_log_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("events.jsonl");
    assert!(open_event_sink(true, Some(&path)).is_err());
}
