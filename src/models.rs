//! Core data models for the batch pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One discovered input file plus where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Absolute path of the source file
    pub source: PathBuf,
    /// Path relative to the input root
    pub relative: PathBuf,
    /// Root the relative path is mirrored under
    pub output_root: PathBuf,
}

impl WorkItem {
    pub fn new(source: PathBuf, relative: PathBuf, output_root: PathBuf) -> Self {
        Self {
            source,
            relative,
            output_root,
        }
    }

    /// Destination with the source's own extension
    pub fn destination(&self) -> PathBuf {
        self.output_root.join(&self.relative)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Outcome category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Converted,
    Copied,
    Skipped,
    Failed,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Converted => "converted",
            OutcomeKind::Copied => "copied",
            OutcomeKind::Skipped => "skipped",
            OutcomeKind::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of processing one work item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Transcoded into the given output path
    Converted(PathBuf),
    /// Copied unchanged to the given output path
    Copied(PathBuf),
    /// Output already existed; nothing was done
    Skipped(PathBuf),
    /// Processing failed
    Error { source: PathBuf, message: String },
}

impl Outcome {
    pub fn error(source: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Outcome::Error {
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Converted(_) => OutcomeKind::Converted,
            Outcome::Copied(_) => OutcomeKind::Copied,
            Outcome::Skipped(_) => OutcomeKind::Skipped,
            Outcome::Error { .. } => OutcomeKind::Failed,
        }
    }

    /// The output path for successful outcomes, the source for errors
    pub fn path(&self) -> &Path {
        match self {
            Outcome::Converted(p) | Outcome::Copied(p) | Outcome::Skipped(p) => p,
            Outcome::Error { source, .. } => source,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }
}

/// Entry in the error report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Source file name
    pub file: String,
    /// Diagnostic message
    pub error: String,
}

/// Summary of a conversion run, written once at drain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Outputs produced by the transcoder
    pub converted: Vec<String>,
    /// Outputs copied unchanged
    pub copied: Vec<String>,
    /// Outputs that already existed
    pub skipped: Vec<String>,
    /// Items that failed
    pub failed: Vec<FailureEntry>,
    /// Number of outcomes recorded
    pub total_files_processed: u64,
    /// Wall time, truncated to whole seconds
    pub total_time_sec: u64,
    /// Items per second, rounded to two decimals
    pub average_speed_tracks_per_sec: f64,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.failed.len()
    }
}

/// Normalized tag metadata for one audio file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioMetadataRecord {
    pub path: String,
    pub title: String,
    pub artist: String,
    pub album_artist: String,
    pub album: String,
    pub year: String,
    /// Bare integer or "N/M"; empty when the source value is neither
    pub track: String,
    /// Same form as `track`
    pub disc: String,
    pub publisher: String,
    pub composer: String,
    pub genre: String,
    /// Seconds
    pub duration: f64,
    /// Kbps
    pub bitrate: u32,
}

/// Round to a fixed number of decimals
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
