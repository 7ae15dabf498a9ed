//! External transcoder contract and the ffmpeg adapter

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ItemError;

/// Converts one input file into one output file
pub trait Transcoder: Send + Sync {
    /// Produce `output` from `input`. The output may be overwritten.
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), ItemError>;
}

/// True when diagnostic output mentions an error.
///
/// ffmpeg can report a damaged stream and still exit 0, so any
/// case-insensitive "error" in stderr counts as a failure. Tools whose normal
/// output contains that word will produce false failures.
pub fn stderr_reports_error(stderr: &str) -> bool {
    stderr.to_lowercase().contains("error")
}

/// Runs `ffmpeg -i <in> -b:a <bitrate> -map_metadata 0 <out> -y`
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    bitrate: String,
}

impl FfmpegTranscoder {
    pub fn new(bitrate: impl Into<String>) -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            bitrate: bitrate.into(),
        }
    }

    /// Use a specific ffmpeg binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-i")
            .arg(input)
            .arg("-b:a")
            .arg(&self.bitrate)
            .arg("-map_metadata")
            .arg("0")
            .arg(output)
            .arg("-y");
        cmd
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), ItemError> {
        let result = self
            .command(input, output)
            .output()
            .map_err(|e| {
                ItemError::TransformFailure(format!("failed to run {:?}: {}", self.program, e))
            })?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !result.status.success() || stderr_reports_error(&stderr) {
            let message = if stderr.trim().is_empty() {
                format!("{:?} exited with {}", self.program, result.status)
            } else {
                stderr.into_owned()
            };
            return Err(ItemError::TransformFailure(message));
        }

        Ok(())
    }
}
