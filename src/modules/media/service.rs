use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use url::Url;

use super::error::{JobError, JobResult};
use super::manifest;
use super::model::{JobKind, JobStage, LocalAsset, MediaJob};
use super::workspace::JobWorkspace;
use crate::infrastructure::http::fetcher::FetchError;
use crate::infrastructure::media::ffmpeg::FfmpegError;
use crate::infrastructure::storage::s3::StorageError;

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Store the resource at `url` in exactly `dest` and return the byte count.
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError>;
}

#[async_trait]
pub trait MediaProcessor: Send + Sync {
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), FfmpegError>;

    async fn to_mp3(&self, input: &Path, output: &Path, bitrate: &str) -> Result<(), FfmpegError>;
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Push `path` to object storage and return a publicly resolvable URL.
    async fn upload(&self, path: &Path) -> Result<String, StorageError>;
}

/// Runs media jobs: download, produce, verify, upload, clean up.
#[derive(Clone)]
pub struct MediaService {
    fetcher: Arc<dyn MediaFetcher>,
    processor: Arc<dyn MediaProcessor>,
    uploader: Arc<dyn MediaUploader>,
    storage_path: PathBuf,
}

impl MediaService {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        processor: Arc<dyn MediaProcessor>,
        uploader: Arc<dyn MediaUploader>,
        storage_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            processor,
            uploader,
            storage_path: storage_path.into(),
        }
    }

    pub async fn run(&self, job: &MediaJob) -> JobResult<String> {
        let workspace = JobWorkspace::new(
            &self.storage_path,
            &job.job_id,
            job.videos.iter().map(|v| &v.video_url),
            job.kind.output_extension(),
        );

        let result = self.execute(job, &workspace).await;

        info!(job_id = %job.job_id, stage = %JobStage::CleaningUp, "Sweeping temporary files");
        let removed = workspace.cleanup().await;

        match &result {
            Ok(url) => info!(
                job_id = %job.job_id,
                stage = %JobStage::Done,
                removed,
                "✅ Media job completed: {}", url
            ),
            Err(e) => error!(
                job_id = %job.job_id,
                stage = %e.stage(),
                removed,
                "❌ Media job failed: {}", e
            ),
        }

        result
    }

    async fn execute(&self, job: &MediaJob, workspace: &JobWorkspace) -> JobResult<String> {
        let job_id = job.job_id.as_str();

        info!(job_id, stage = %JobStage::Downloading, "Downloading {} videos", job.videos.len());
        // Sequential on purpose: the manifest is assembled in request order.
        let mut assets = Vec::with_capacity(job.videos.len());
        for (video, dest) in job.videos.iter().zip(workspace.inputs()) {
            self.fetcher
                .fetch(&video.video_url, dest)
                .await
                .map_err(|source| JobError::Download {
                    url: video.video_url.to_string(),
                    source,
                })?;

            assets.push(LocalAsset {
                path: dest.clone(),
                repeat_count: video.repeat_count,
            });
        }

        match &job.kind {
            JobKind::Concat => self.concat(job_id, workspace, &assets).await?,
            // Without an input nothing is written and the output check below fails.
            JobKind::Mp3 { bitrate } => {
                if let Some(input) = assets.first() {
                    info!(job_id, stage = %JobStage::Transcoding, "Converting to MP3 at {}", bitrate);
                    self.processor
                        .to_mp3(&input.path, workspace.output(), bitrate)
                        .await
                        .map_err(JobError::Transcode)?;
                }
            }
        }

        info!(job_id, stage = %JobStage::VerifyingOutput, "Checking output file");
        let output = workspace.output();
        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(JobError::MissingOutput(output.to_path_buf()));
        }

        info!(job_id, stage = %JobStage::Uploading, "Uploading {}", output.display());
        let url = self
            .uploader
            .upload(output)
            .await
            .map_err(|e| JobError::upload(output, e.to_string()))?;

        if url.trim().is_empty() {
            return Err(JobError::upload(output, "storage returned an empty URL"));
        }

        Ok(url)
    }

    async fn concat(&self, job_id: &str, workspace: &JobWorkspace, assets: &[LocalAsset]) -> JobResult<()> {
        info!(job_id, stage = %JobStage::Manifesting, "Writing concat manifest");
        manifest::write(workspace.manifest(), assets)
            .await
            .map_err(|source| JobError::ManifestWrite {
                path: workspace.manifest().to_path_buf(),
                source,
            })?;

        info!(job_id, stage = %JobStage::Concatenating, "Running stream-copy concat");
        self.processor
            .concat(workspace.manifest(), workspace.output())
            .await?;
        Ok(())
    }
}
