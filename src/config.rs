//! Configuration for the conversion and metadata pipelines

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Extension written for transcoded files
pub const DEFAULT_TARGET_EXTENSION: &str = "mp3";

/// Bitrate handed to the encoder (maximum MP3 quality tier)
pub const DEFAULT_TARGET_BITRATE: &str = "320k";

/// Default directory for conversion logs
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Default directory for metadata summaries
pub const DEFAULT_SUMMARY_DIR: &str = "summary";

/// Worker count used when the number of processing units cannot be detected
pub const FALLBACK_WORKERS: usize = 2;

/// Resolve a configured worker count; 0 means auto-detect
pub fn resolve_workers(configured: usize) -> usize {
    if configured == 0 {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(FALLBACK_WORKERS)
    } else {
        configured
    }
}

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Lowercased extension of a path, without the dot
pub fn extension_of(path: &std::path::Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Configuration for the transcode-or-copy pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Root of the tree to process
    pub input_dir: PathBuf,

    /// Root the input structure is mirrored under
    pub output_dir: PathBuf,

    /// Where the error and summary reports are written
    pub logs_dir: PathBuf,

    /// Extensions (lowercase, no dot) that are transcoded; everything else is copied
    pub transform_extensions: HashSet<String>,

    /// Extension given to transcoded outputs
    pub target_extension: String,

    /// Encoder bitrate argument
    pub target_bitrate: String,

    /// Number of workers, 0 = auto
    pub num_workers: usize,

    /// Emit JSON progress lines on stderr
    pub show_progress: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            transform_extensions: Self::default_transform_extensions(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            target_bitrate: DEFAULT_TARGET_BITRATE.to_string(),
            num_workers: 0,
            show_progress: true,
        }
    }
}

impl ConvertConfig {
    /// Create a config builder
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::new()
    }

    /// Audio formats converted by default
    pub fn default_transform_extensions() -> HashSet<String> {
        to_set(&["flac", "wav", "ogg", "m4a"])
    }

    /// Check whether a file extension belongs to the transformable class
    pub fn is_transformable(&self, ext: &str) -> bool {
        self.transform_extensions.contains(&ext.to_lowercase())
    }

    /// Get the effective number of workers
    pub fn effective_workers(&self) -> usize {
        resolve_workers(self.num_workers)
    }
}

/// Builder for ConvertConfig
#[derive(Debug, Default)]
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
}

impl ConvertConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.logs_dir = dir.into();
        self
    }

    /// Replace the transformable extension set (case-insensitive)
    pub fn transform_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.transform_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn target_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.target_extension = ext.into();
        self
    }

    pub fn target_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.config.target_bitrate = bitrate.into();
        self
    }

    pub fn num_workers(mut self, workers: usize) -> Self {
        self.config.num_workers = workers;
        self
    }

    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.config.show_progress = enabled;
        self
    }

    pub fn build(self) -> ConvertConfig {
        self.config
    }
}

/// Configuration for the metadata-extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Root of the music library
    pub music_dir: PathBuf,

    /// Where per-run summary directories are created
    pub summary_dir: PathBuf,

    /// Extensions (lowercase, no dot) considered audio
    pub audio_extensions: HashSet<String>,

    /// Ask the enrichment service for a free-text analysis
    pub use_ai: bool,

    /// Number of workers, 0 = auto
    pub num_workers: usize,

    /// Emit JSON progress lines on stderr
    pub show_progress: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::new(),
            summary_dir: PathBuf::from(DEFAULT_SUMMARY_DIR),
            audio_extensions: Self::default_audio_extensions(),
            use_ai: false,
            num_workers: 0,
            show_progress: true,
        }
    }
}

impl MetadataConfig {
    /// Create a config builder
    pub fn builder() -> MetadataConfigBuilder {
        MetadataConfigBuilder::new()
    }

    /// Audio formats analyzed by default
    pub fn default_audio_extensions() -> HashSet<String> {
        to_set(&["mp3", "flac", "wav", "m4a", "aac", "ogg"])
    }

    /// Check if an extension should be analyzed
    pub fn is_audio(&self, ext: &str) -> bool {
        self.audio_extensions.contains(&ext.to_lowercase())
    }

    /// Get the effective number of workers
    pub fn effective_workers(&self) -> usize {
        resolve_workers(self.num_workers)
    }
}

/// Builder for MetadataConfig
#[derive(Debug, Default)]
pub struct MetadataConfigBuilder {
    config: MetadataConfig,
}

impl MetadataConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn music_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.music_dir = dir.into();
        self
    }

    pub fn summary_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.summary_dir = dir.into();
        self
    }

    pub fn audio_extensions(mut self, extensions: HashSet<String>) -> Self {
        self.config.audio_extensions = extensions;
        self
    }

    pub fn use_ai(mut self, enabled: bool) -> Self {
        self.config.use_ai = enabled;
        self
    }

    pub fn num_workers(mut self, workers: usize) -> Self {
        self.config.num_workers = workers;
        self
    }

    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.config.show_progress = enabled;
        self
    }

    pub fn build(self) -> MetadataConfig {
        self.config
    }
}
