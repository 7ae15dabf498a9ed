//! Error types for the batch pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Kinds of fatal pipeline errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    /// Input root missing or not a directory
    InvalidInput,
    /// The worker pool could not be constructed
    PoolBuild,
    /// A report could not be serialized or written
    ReportWrite,
}

/// A fatal error that aborts the whole run
#[derive(Debug, Error)]
#[error("{kind:?}: {message} (path: {path:?})")]
pub struct PipelineError {
    /// The kind of error
    pub kind: PipelineErrorKind,
    /// The path involved, if any
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl PipelineError {
    /// Create a new pipeline error
    pub fn new(kind: PipelineErrorKind, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Input root does not exist or is not a directory
    pub fn invalid_input(path: PathBuf) -> Self {
        Self::new(
            PipelineErrorKind::InvalidInput,
            Some(path.clone()),
            format!("Input directory does not exist or is not a directory: {:?}", path),
        )
    }

    /// Worker pool construction failed
    pub fn pool_build(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::PoolBuild, None, message)
    }

    /// Report serialization or write failed
    pub fn report_write(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::ReportWrite, Some(path), message)
    }
}

/// A per-item failure, converted into an `Outcome::Error` at the task boundary
#[derive(Debug, Error)]
pub enum ItemError {
    /// The external transform tool failed or reported an error
    #[error("{0}")]
    TransformFailure(String),

    /// Copying a pass-through file failed
    #[error("copy failed: {0}")]
    CopyFailure(#[source] std::io::Error),

    /// An earlier item in enumeration order maps to the same destination
    #[error("destination {destination:?} already claimed by {claimed_by:?}")]
    DestinationClaimed {
        destination: PathBuf,
        claimed_by: PathBuf,
    },

    /// Any other filesystem fault (directory creation, metadata)
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Enrichment failures; always degraded to a placeholder, never fatal
#[derive(Debug, Error)]
pub enum EnrichError {
    /// No API key configured
    #[error("GEMINI_API_KEY is not set")]
    MissingCredentials,

    /// HTTP or decoding failure
    #[error("enrichment request failed: {0}")]
    Request(String),

    /// The service replied without any text
    #[error("enrichment response contained no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for EnrichError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
