//! FFmpeg invocations: concat-demuxer joins and MP3 transcodes.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::modules::media::service::MediaProcessor;

#[derive(Debug, Error)]
pub enum FfmpegError {
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg exited with code {}: {stderr}", .exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Arguments for a stream-copy concatenation of a manifest.
#[derive(Debug, Clone)]
pub struct ConcatCommand {
    manifest: PathBuf,
    output: PathBuf,
    overwrite: bool,
    log_level: String,
}

impl ConcatCommand {
    pub fn new(manifest: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            manifest: manifest.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.extend(["-v".to_string(), self.log_level.clone()]);

        // Absolute paths outside the manifest's directory need safe=0.
        args.extend(["-f", "concat", "-safe", "0"].map(String::from));
        args.push("-i".to_string());
        args.push(self.manifest.to_string_lossy().to_string());

        args.extend(["-c", "copy"].map(String::from));
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Arguments for an audio-only MP3 transcode.
#[derive(Debug, Clone)]
pub struct Mp3Command {
    input: PathBuf,
    output: PathBuf,
    bitrate: String,
}

impl Mp3Command {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>, bitrate: impl Into<String>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            bitrate: bitrate.into(),
        }
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-v", "error", "-i"].map(String::from).into();
        args.push(self.input.to_string_lossy().to_string());

        args.extend(["-vn", "-acodec", "libmp3lame", "-b:a"].map(String::from));
        args.push(self.bitrate.clone());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    binary: String,
}

impl FfmpegRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub async fn run(&self, args: &[String]) -> Result<(), FfmpegError> {
        debug!("Running {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| FfmpegError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FfmpegError::Failed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MediaProcessor for FfmpegRunner {
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), FfmpegError> {
        self.run(&ConcatCommand::new(manifest, output).build_args()).await?;
        info!("🎬 Concatenated {} into {}", manifest.display(), output.display());
        Ok(())
    }

    async fn to_mp3(&self, input: &Path, output: &Path, bitrate: &str) -> Result<(), FfmpegError> {
        self.run(&Mp3Command::new(input, output, bitrate).build_args()).await?;
        info!("🎵 Transcoded {} to MP3 at {}", input.display(), bitrate);
        Ok(())
    }
}

/// Check that the ffmpeg binary resolves.
pub fn check_ffmpeg(binary: &str) -> Result<PathBuf, which::Error> {
    which::which(binary)
}
