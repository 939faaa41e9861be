//! Failure taxonomy for media jobs.

use std::path::PathBuf;

use thiserror::Error;

use super::model::JobStage;
use crate::infrastructure::http::fetcher::FetchError;
use crate::infrastructure::media::ffmpeg::FfmpegError;

pub type JobResult<T> = Result<T, JobError>;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to write concat manifest {}: {source}", .path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Concatenation failed: {0}")]
    Concatenation(#[from] FfmpegError),

    #[error("MP3 conversion failed: {0}")]
    Transcode(#[source] FfmpegError),

    #[error("Output file {} does not exist after processing", .0.display())]
    MissingOutput(PathBuf),

    #[error("Failed to upload the output file {}: {reason}", .path.display())]
    Upload { path: PathBuf, reason: String },
}

impl JobError {
    /// Stage the job was in when it failed.
    pub fn stage(&self) -> JobStage {
        match self {
            JobError::Download { .. } => JobStage::Downloading,
            JobError::ManifestWrite { .. } => JobStage::Manifesting,
            JobError::Concatenation(_) => JobStage::Concatenating,
            JobError::Transcode(_) => JobStage::Transcoding,
            JobError::MissingOutput(_) => JobStage::VerifyingOutput,
            JobError::Upload { .. } => JobStage::Uploading,
        }
    }

    pub fn upload(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        JobError::Upload {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
