//! Result aggregation and report writing

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PipelineError;
use crate::models::{round_to, FailureEntry, Outcome, RunReport};

/// Timestamp format embedded in report names (ddMMyyyy_HHmmss)
pub const TIMESTAMP_FORMAT: &str = "%d%m%Y_%H%M%S";

/// Per-invocation context: the run timestamp and where reports go
#[derive(Debug, Clone)]
pub struct RunContext {
    timestamp: String,
    reports_dir: PathBuf,
}

impl RunContext {
    /// Context stamped with the current local time
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self::at(reports_dir, Local::now())
    }

    /// Context stamped with a fixed time
    pub fn at(reports_dir: impl Into<PathBuf>, time: DateTime<Local>) -> Self {
        Self {
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
            reports_dir: reports_dir.into(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Conversion error report
    pub fn error_log(&self) -> PathBuf {
        self.reports_dir
            .join(format!("log_errors_{}.json", self.timestamp))
    }

    /// Conversion summary report
    pub fn summary_log(&self) -> PathBuf {
        self.reports_dir
            .join(format!("log_summary_{}.json", self.timestamp))
    }

    /// Per-run directory for metadata reports
    pub fn metadata_dir(&self) -> PathBuf {
        self.reports_dir.join(&self.timestamp)
    }

    /// Full per-file metadata listing
    pub fn metadata_report(&self) -> PathBuf {
        self.metadata_dir()
            .join(format!("musica_metadatos_{}.json", self.timestamp))
    }

    /// Library summary
    pub fn metadata_summary(&self) -> PathBuf {
        self.metadata_dir()
            .join(format!("musica_metadatos_resumen_{}.json", self.timestamp))
    }

    /// Free-text enrichment output
    pub fn enrichment_text(&self) -> PathBuf {
        self.metadata_dir()
            .join(format!("musica_metadatos_resumen_ia_{}.txt", self.timestamp))
    }
}

/// Collects outcomes as they complete
#[derive(Debug, Default)]
pub struct ResultAggregator {
    converted: Vec<String>,
    copied: Vec<String>,
    skipped: Vec<String>,
    failed: Vec<FailureEntry>,
    errors: Vec<FailureEntry>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome to its category
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted(p) => self.converted.push(p.to_string_lossy().to_string()),
            Outcome::Copied(p) => self.copied.push(p.to_string_lossy().to_string()),
            Outcome::Skipped(p) => self.skipped.push(p.to_string_lossy().to_string()),
            Outcome::Error { source, message } => {
                let entry = FailureEntry {
                    file: crate::models::file_name_of(source),
                    error: message.clone(),
                };
                self.failed.push(entry.clone());
                self.errors.push(entry);
            }
        }
    }

    pub fn processed(&self) -> u64 {
        (self.converted.len() + self.copied.len() + self.skipped.len() + self.failed.len()) as u64
    }

    /// Freeze into the final report
    pub fn finish(self, elapsed: Duration) -> (RunReport, Vec<FailureEntry>) {
        let total = self.processed();
        let secs = elapsed.as_secs_f64();
        let speed = if secs > 0.0 {
            round_to(total as f64 / secs, 2)
        } else {
            0.0
        };

        let report = RunReport {
            converted: self.converted,
            copied: self.copied,
            skipped: self.skipped,
            failed: self.failed,
            total_files_processed: total,
            total_time_sec: elapsed.as_secs(),
            average_speed_tracks_per_sec: speed,
        };
        (report, self.errors)
    }
}

/// Write a value as pretty JSON (2-space indent, UTF-8 kept literal)
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| PipelineError::report_write(path.to_path_buf(), e.to_string()))?;
    write_text(path, &format!("{}\n", json))
}

/// Write text, creating parent directories
pub fn write_text(path: &Path, contents: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| PipelineError::report_write(parent.to_path_buf(), e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| PipelineError::report_write(path.to_path_buf(), e.to_string()))
}

/// Write the conversion error and summary reports; returns their paths
pub fn write_conversion_reports(
    context: &RunContext,
    report: &RunReport,
    errors: &[FailureEntry],
) -> Result<Vec<PathBuf>, PipelineError> {
    let error_log = context.error_log();
    let summary_log = context.summary_log();
    write_json(&error_log, errors)?;
    write_json(&summary_log, report)?;
    log::info!("Summary saved to {:?}", summary_log);
    log::info!("Errors saved to {:?}", error_log);
    Ok(vec![error_log, summary_log])
}
