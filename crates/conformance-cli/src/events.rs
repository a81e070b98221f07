// crates/conformance-cli/src/events.rs
// ============================================================================
// Module: Run Events
// Description: Structured JSON-line events for check and report runs.
// Purpose: Record what each run did, separately from console output.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every event serializes to one JSON object per line with an `event` name
//! and a `timestamp_ms` field. Sinks never fail the run: a sink that cannot
//! write drops the event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use conformance_core::CheckReport;
use conformance_core::CheckStatus;
use conformance_core::HashDigest;
use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Emitted after the checker finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRunEvent {
    /// Event name.
    pub event: &'static str,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u128,
    /// Test cases inspected.
    pub cases_checked: usize,
    /// Checks that ran.
    pub checks_run: usize,
    /// Checks skipped.
    pub checks_skipped: usize,
    /// Violation count per check name.
    pub violations: BTreeMap<String, usize>,
    /// Overall status.
    pub status: CheckStatus,
}

impl CheckRunEvent {
    /// Summarizes a check report.
    #[must_use]
    pub fn from_report(report: &CheckReport) -> Self {
        Self {
            event: "check_run",
            timestamp_ms: now_ms(),
            cases_checked: report.cases_checked,
            checks_run: report.checks_run.len(),
            checks_skipped: report.checks_skipped.len(),
            violations: report
                .count_by_kind()
                .into_iter()
                .map(|(kind, count)| (kind.as_str().to_string(), count))
                .collect(),
            status: report.status,
        }
    }
}

/// Emitted after report artifacts are written or verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportWrittenEvent {
    /// Event name.
    pub event: &'static str,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u128,
    /// Output directory.
    pub output_dir: String,
    /// Canonical digest of the summary tree.
    pub summary_digest: HashDigest,
    /// Features in the summary.
    pub feature_count: usize,
    /// Test rows in the summary.
    pub test_count: usize,
    /// True when existing output was verified instead of written.
    pub verified: bool,
}

impl ReportWrittenEvent {
    /// Creates a report event stamped with the current time.
    #[must_use]
    pub fn new(
        output_dir: &Path,
        summary_digest: HashDigest,
        feature_count: usize,
        test_count: usize,
        verified: bool,
    ) -> Self {
        Self {
            event: "report_written",
            timestamp_ms: now_ms(),
            output_dir: output_dir.display().to_string(),
            summary_digest,
            feature_count,
            test_count,
            verified,
        }
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|elapsed| elapsed.as_millis()).unwrap_or(0)
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for run events.
pub trait EventSink: Send + Sync {
    /// Records a check run.
    fn record_check_run(&self, event: &CheckRunEvent);

    /// Records a report run.
    fn record_report_written(&self, event: &ReportWrittenEvent);
}

/// Writes events to stderr.
pub struct StderrEventSink;

impl StderrEventSink {
    /// Writes one serialized event.
    fn write_value<T: Serialize>(event: &T) {
        if let Ok(line) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{line}");
        }
    }
}

impl EventSink for StderrEventSink {
    fn record_check_run(&self, event: &CheckRunEvent) {
        Self::write_value(event);
    }

    fn record_report_written(&self, event: &ReportWrittenEvent) {
        Self::write_value(event);
    }
}

/// Appends events to a file.
pub struct FileEventSink {
    /// Open append-only handle.
    file: Mutex<File>,
}

impl FileEventSink {
    /// Opens or creates the event log at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be opened for appending.
    pub fn new(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn write_value<T: Serialize>(&self, event: &T) {
        if let Ok(line) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    }
}

impl EventSink for FileEventSink {
    fn record_check_run(&self, event: &CheckRunEvent) {
        self.write_value(event);
    }

    fn record_report_written(&self, event: &ReportWrittenEvent) {
        self.write_value(event);
    }
}

/// Discards events.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record_check_run(&self, _event: &CheckRunEvent) {}

    fn record_report_written(&self, _event: &ReportWrittenEvent) {}
}

/// Selects a sink from the logging settings.
///
/// # Errors
///
/// Returns an I/O error when a file sink cannot be opened.
pub fn open_event_sink(enabled: bool, path: Option<&Path>) -> std::io::Result<Box<dyn EventSink>> {
    if !enabled {
        return Ok(Box::new(NoopEventSink));
    }
    match path {
        Some(path) => Ok(Box::new(FileEventSink::new(path)?)),
        None => Ok(Box::new(StderrEventSink)),
    }
}
