//! Parallel batch processing for music libraries
//!
//! Two pipelines share one enumerate, dispatch and aggregate skeleton:
//! conversion transcodes or copies every file into a mirrored tree, and
//! metadata extracts tags and summarizes the library.

pub mod classifier;
pub mod config;
pub mod enrich;
pub mod error;
pub mod library;
pub mod models;
pub mod pipeline;
pub mod pool;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod tags;
pub mod transcode;

pub use config::{ConvertConfig, MetadataConfig};
pub use enrich::{Enricher, Enrichment, GeminiEnricher, MissingCredentials};
pub use error::{EnrichError, ItemError, PipelineError, PipelineErrorKind};
pub use library::LibrarySummary;
pub use models::{AudioMetadataRecord, FailureEntry, Outcome, OutcomeKind, RunReport, WorkItem};
pub use pipeline::{run_conversion, run_metadata, ConversionRun, MetadataRun, RunStatus};
pub use progress::{NullObserver, PipelineObserver, ProgressReporter};
pub use report::RunContext;
pub use tags::{LoftyTagReader, TagReader};
pub use transcode::{FfmpegTranscoder, Transcoder};
