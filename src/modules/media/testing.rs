//! In-memory collaborators for exercising the job pipeline without network,
//! ffmpeg or object storage.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use super::service::{MediaFetcher, MediaProcessor, MediaUploader};
use crate::infrastructure::http::fetcher::FetchError;
use crate::infrastructure::media::ffmpeg::FfmpegError;
use crate::infrastructure::storage::s3::StorageError;

/// Writes `[<last path segment>]` for every URL it is asked to fetch.
#[derive(Default)]
pub struct FakeFetcher {
    fail_at: Option<usize>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.to_string());
            calls.len() - 1
        };

        if self.fail_at == Some(index) {
            return Err(FetchError::Io(std::io::Error::other("connection reset")));
        }

        let name = url
            .path_segments()
            .and_then(|mut s| s.next_back())
            .unwrap_or_default();
        let body = format!("[{name}]");
        tokio::fs::write(dest, &body).await?;
        Ok(body.len() as u64)
    }
}

pub enum ConcatBehavior {
    /// Byte-concatenate every manifest entry into the output. MP3 conversion
    /// writes `mp3@<bitrate>:` followed by the input bytes.
    Concatenate,
    Fail,
    SucceedWithoutOutput,
}

pub struct FakeProcessor {
    behavior: ConcatBehavior,
    calls: Mutex<usize>,
    last_manifest: Mutex<Option<String>>,
    last_bitrate: Mutex<Option<String>>,
}

impl FakeProcessor {
    pub fn new(behavior: ConcatBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(0),
            last_manifest: Mutex::new(None),
            last_bitrate: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn last_manifest(&self) -> Option<String> {
        self.last_manifest.lock().unwrap().clone()
    }

    pub fn last_bitrate(&self) -> Option<String> {
        self.last_bitrate.lock().unwrap().clone()
    }
}

fn failed(stderr: String) -> FfmpegError {
    FfmpegError::Failed {
        exit_code: Some(1),
        stderr,
    }
}

fn manifest_entry(line: &str) -> Option<String> {
    let quoted = line.strip_prefix("file '")?.strip_suffix('\'')?;
    Some(quoted.replace(r"'\''", "'"))
}

#[async_trait]
impl MediaProcessor for FakeProcessor {
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), FfmpegError> {
        *self.calls.lock().unwrap() += 1;

        let body = tokio::fs::read_to_string(manifest)
            .await
            .map_err(|e| failed(e.to_string()))?;
        *self.last_manifest.lock().unwrap() = Some(body.clone());

        match self.behavior {
            ConcatBehavior::Fail => Err(failed("Invalid data found when processing input".to_string())),
            ConcatBehavior::SucceedWithoutOutput => Ok(()),
            ConcatBehavior::Concatenate => {
                let mut joined = Vec::new();
                for line in body.lines() {
                    let entry = manifest_entry(line).ok_or_else(|| failed(format!("bad line: {line}")))?;
                    let bytes = tokio::fs::read(&entry)
                        .await
                        .map_err(|e| failed(e.to_string()))?;
                    joined.extend(bytes);
                }
                tokio::fs::write(output, joined)
                    .await
                    .map_err(|e| failed(e.to_string()))
            }
        }
    }

    async fn to_mp3(&self, input: &Path, output: &Path, bitrate: &str) -> Result<(), FfmpegError> {
        *self.calls.lock().unwrap() += 1;
        *self.last_bitrate.lock().unwrap() = Some(bitrate.to_string());

        match self.behavior {
            ConcatBehavior::Fail => Err(failed("Unknown encoder 'libmp3lame'".to_string())),
            ConcatBehavior::SucceedWithoutOutput => Ok(()),
            ConcatBehavior::Concatenate => {
                let mut bytes = format!("mp3@{bitrate}:").into_bytes();
                bytes.extend(tokio::fs::read(input).await.map_err(|e| failed(e.to_string()))?);
                tokio::fs::write(output, bytes)
                    .await
                    .map_err(|e| failed(e.to_string()))
            }
        }
    }
}

pub enum UploadBehavior {
    Url(String),
    Fail,
}

pub struct FakeUploader {
    behavior: UploadBehavior,
    calls: Mutex<usize>,
    uploaded: Mutex<Option<Vec<u8>>>,
}

impl FakeUploader {
    pub fn new(behavior: UploadBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(0),
            uploaded: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Contents of the output file as it was at upload time.
    pub fn uploaded_bytes(&self) -> Option<Vec<u8>> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaUploader for FakeUploader {
    async fn upload(&self, path: &Path) -> Result<String, StorageError> {
        *self.calls.lock().unwrap() += 1;
        let bytes = tokio::fs::read(path).await.ok();
        *self.uploaded.lock().unwrap() = bytes;

        match &self.behavior {
            UploadBehavior::Url(url) => Ok(url.clone()),
            UploadBehavior::Fail => Err(StorageError::BucketNotConfigured),
        }
    }
}
