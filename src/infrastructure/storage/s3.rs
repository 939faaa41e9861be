use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use thiserror::Error;
use tracing::info;

use crate::config::settings::AppConfig;
use crate::modules::media::service::MediaUploader;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage bucket is not configured")]
    BucketNotConfigured,

    #[error("{} has no file name to use as an object key", .0.display())]
    InvalidKey(PathBuf),

    #[error("upload of {key} failed: {reason}")]
    UploadFailed { key: String, reason: String },
}

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
    public_url: String,
}

impl StorageService {
    pub fn new(
        endpoint: &str,
        region: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        public_url: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(config);

        info!("✅ Configured S3 storage (bucket '{}')", bucket);

        Self {
            client,
            bucket: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.s3_endpoint,
            &config.s3_region,
            &config.s3_bucket,
            &config.s3_access_key,
            &config.s3_secret_key,
            &config.s3_public_url,
        )
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    /// Upload a local file under `key` and return its public URL.
    pub async fn upload_file(&self, path: &Path, key: &str) -> Result<String, StorageError> {
        if self.bucket.trim().is_empty() {
            return Err(StorageError::BucketNotConfigured);
        }

        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::UploadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type.essence_str())
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(self.public_url(key))
    }
}

#[async_trait]
impl MediaUploader for StorageService {
    async fn upload(&self, path: &Path) -> Result<String, StorageError> {
        let key = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StorageError::InvalidKey(path.to_path_buf()))?;

        let url = self.upload_file(path, key).await?;
        info!("⬆️ Uploaded {} to {}", path.display(), url);
        Ok(url)
    }
}
