//! Progress tracking and reporting
//!
//! [`ProgressTracker`] turns completion events into throughput and ETA
//! figures. [`PipelineObserver`] is the seam front ends hook into; the
//! bundled [`ProgressReporter`] writes one JSON line per event to stderr.

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Elapsed times below this are treated as zero
const ELAPSED_EPSILON: f64 = 1e-9;

/// Tracker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgressState {
    /// Some items are still outstanding
    #[default]
    Running,
    /// Every item has completed
    Done,
}

/// Derived progress figures after one completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct ProgressSnapshot {
    pub completed: u64,
    pub total: u64,
    pub elapsed_secs: f64,
    /// Items per second; 0 when no time has elapsed
    pub throughput: f64,
    /// Seconds remaining; 0 when throughput is 0
    pub eta_secs: f64,
    pub state: ProgressState,
}

impl ProgressSnapshot {
    /// Completion percentage, 100 for an empty run
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total) as u8
    }

    /// ETA as `MM:SS`
    pub fn eta_clock(&self) -> String {
        let eta = self.eta_secs as u64;
        format!("{:02}:{:02}", eta / 60, eta % 60)
    }
}

/// Counts completions against a fixed total
#[derive(Debug)]
pub struct ProgressTracker {
    total: u64,
    completed: u64,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            completed: 0,
        }
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn state(&self) -> ProgressState {
        if self.completed >= self.total {
            ProgressState::Done
        } else {
            ProgressState::Running
        }
    }

    /// Record one completion observed `elapsed` after the start
    pub fn record(&mut self, elapsed: Duration) -> ProgressSnapshot {
        if self.completed < self.total {
            self.completed += 1;
        }
        self.snapshot(elapsed)
    }

    /// Current figures without recording anything
    pub fn snapshot(&self, elapsed: Duration) -> ProgressSnapshot {
        let elapsed_secs = elapsed.as_secs_f64();
        let throughput = if elapsed_secs > ELAPSED_EPSILON {
            self.completed as f64 / elapsed_secs
        } else {
            0.0
        };
        let remaining = self.total - self.completed;
        let eta_secs = if throughput > 0.0 {
            remaining as f64 / throughput
        } else {
            0.0
        };

        ProgressSnapshot {
            completed: self.completed,
            total: self.total,
            elapsed_secs,
            throughput,
            eta_secs,
            state: self.state(),
        }
    }
}

/// What happened to a single item, as seen by observers
#[derive(Debug, Clone, Copy)]
pub struct ItemEvent<'a> {
    /// Outcome label, e.g. "converted" or "analyzed"
    pub status: &'a str,
    pub path: &'a Path,
    pub error: Option<&'a str>,
}

/// End-of-run notification
#[derive(Debug, Clone)]
pub struct FinishEvent {
    pub processed: u64,
    pub failed: usize,
    pub elapsed: Duration,
    /// Reports written by the run
    pub reports: Vec<PathBuf>,
}

/// Receives pipeline events on the consuming thread
pub trait PipelineObserver {
    /// Called once, after enumeration and before dispatch
    fn on_start(&mut self, pipeline: &str, total: u64);

    /// Called after every single completion
    fn on_item(&mut self, snapshot: &ProgressSnapshot, event: &ItemEvent<'_>);

    /// Called once after the reports are written
    fn on_finish(&mut self, event: &FinishEvent);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_start(&mut self, _pipeline: &str, _total: u64) {}
    fn on_item(&mut self, _snapshot: &ProgressSnapshot, _event: &ItemEvent<'_>) {}
    fn on_finish(&mut self, _event: &FinishEvent) {}
}

/// Start message sent when dispatch begins
#[derive(Debug, Clone, Serialize)]
pub struct StartMessage {
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    pub seq: u64,
    pub ts: u64,
    pub pipeline: String,
    pub total: u64,
}

impl StartMessage {
    pub fn new(seq: u64, ts: u64, pipeline: String, total: u64) -> Self {
        Self {
            msg_type: "start",
            seq,
            ts,
            pipeline,
            total,
        }
    }
}

/// Progress message sent after each completion
#[derive(Debug, Clone, Serialize)]
pub struct ProgressMessage {
    /// Message type identifier ("p" for progress)
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    pub seq: u64,
    pub ts: u64,
    pub state: ProgressState,
    /// Completed items
    #[serde(rename = "f")]
    pub completed: u64,
    /// Total items
    #[serde(rename = "n")]
    pub total: u64,
    /// Outcome of the item that just finished
    #[serde(rename = "st")]
    pub status: String,
    pub file: String,
    /// Items per second, two decimals
    pub speed: f64,
    pub ms: u64,
    pub eta_ms: u64,
}

impl ProgressMessage {
    pub fn new(seq: u64, ts: u64, snapshot: &ProgressSnapshot, event: &ItemEvent<'_>) -> Self {
        Self {
            msg_type: "p",
            seq,
            ts,
            state: snapshot.state,
            completed: snapshot.completed,
            total: snapshot.total,
            status: event.status.to_string(),
            file: event.path.to_string_lossy().to_string(),
            speed: crate::models::round_to(snapshot.throughput, 2),
            ms: (snapshot.elapsed_secs * 1000.0) as u64,
            eta_ms: (snapshot.eta_secs * 1000.0) as u64,
        }
    }
}

/// Error message sent when an item fails
#[derive(Debug, Clone, Serialize)]
pub struct ErrorProgressMessage {
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    pub seq: u64,
    pub ts: u64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorProgressMessage {
    pub fn new(seq: u64, ts: u64, message: String, path: Option<String>) -> Self {
        Self {
            msg_type: "err",
            seq,
            ts,
            message,
            path,
        }
    }
}

/// Done message sent once the reports are on disk
#[derive(Debug, Clone, Serialize)]
pub struct DoneMessage {
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    pub seq: u64,
    pub ts: u64,
    /// Total items processed
    #[serde(rename = "tf")]
    pub total_files: u64,
    /// Number of failures
    #[serde(rename = "ec")]
    pub error_count: usize,
    pub ms: u64,
    pub reports: Vec<String>,
}

impl DoneMessage {
    pub fn new(seq: u64, ts: u64, event: &FinishEvent) -> Self {
        Self {
            msg_type: "done",
            seq,
            ts,
            total_files: event.processed,
            error_count: event.failed,
            ms: event.elapsed.as_millis() as u64,
            reports: event
                .reports
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect(),
        }
    }
}

/// Observer that writes JSON lines, one per event
///
/// There is no sampling interval: every completion produces a line.
pub struct ProgressReporter<W: Write = std::io::Stderr> {
    enabled: bool,
    seq: u64,
    start_time: Instant,
    out: W,
}

impl ProgressReporter<std::io::Stderr> {
    /// Reporter writing to stderr
    pub fn new(enabled: bool) -> Self {
        Self::with_writer(enabled, std::io::stderr())
    }
}

impl<W: Write> ProgressReporter<W> {
    pub fn with_writer(enabled: bool, out: W) -> Self {
        Self {
            enabled,
            seq: 0,
            start_time: Instant::now(),
            out,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Next sequence number (monotonically increasing)
    pub fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Milliseconds since reporter creation
    pub fn current_timestamp(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, msg: &T) {
        if let Ok(json) = serde_json::to_string(msg) {
            writeln!(self.out, "{}", json).ok();
            self.out.flush().ok();
        }
    }
}

impl<W: Write> PipelineObserver for ProgressReporter<W> {
    fn on_start(&mut self, pipeline: &str, total: u64) {
        if !self.enabled {
            return;
        }
        let msg = StartMessage::new(
            self.next_seq(),
            self.current_timestamp(),
            pipeline.to_string(),
            total,
        );
        self.emit(&msg);
    }

    fn on_item(&mut self, snapshot: &ProgressSnapshot, event: &ItemEvent<'_>) {
        if !self.enabled {
            return;
        }
        if let Some(error) = event.error {
            let msg = ErrorProgressMessage::new(
                self.next_seq(),
                self.current_timestamp(),
                error.to_string(),
                Some(event.path.to_string_lossy().to_string()),
            );
            self.emit(&msg);
        }
        let msg = ProgressMessage::new(self.next_seq(), self.current_timestamp(), snapshot, event);
        self.emit(&msg);
    }

    fn on_finish(&mut self, event: &FinishEvent) {
        if !self.enabled {
            return;
        }
        let msg = DoneMessage::new(self.next_seq(), self.current_timestamp(), event);
        self.emit(&msg);
    }
}
