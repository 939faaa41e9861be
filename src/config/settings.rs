use std::path::PathBuf;

use crate::config::env::{self, EnvKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    /// Root directory for per-job temporary files.
    pub storage_path: PathBuf,
    pub api_key: String,
    pub s3_endpoint: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub s3_public_url: String,
    pub ffmpeg_path: String,
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get(key).map_err(|_| ConfigError::Missing(name))
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let s3_endpoint = required(EnvKey::S3Endpoint)?;
        let s3_bucket = required(EnvKey::S3Bucket)?;
        let s3_public_url = env::get_opt(EnvKey::S3PublicUrl)
            .unwrap_or_else(|| format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket));

        let config = Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 8080),
            storage_path: env::get_opt(EnvKey::StoragePath)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            api_key: required(EnvKey::ApiKey)?,
            s3_endpoint,
            s3_bucket,
            s3_region: env::get_or(EnvKey::S3Region, "us-east-1"),
            s3_access_key: required(EnvKey::S3AccessKey)?,
            s3_secret_key: required(EnvKey::S3SecretKey)?,
            s3_public_url,
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would only surface as failures mid-job.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.s3_bucket.trim().is_empty() {
            return Err(ConfigError::Empty(EnvKey::S3Bucket.as_str()));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Empty(EnvKey::ApiKey.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config(storage_path: PathBuf) -> AppConfig {
    AppConfig {
        server_port: 0,
        storage_path,
        api_key: "test-key".to_string(),
        s3_endpoint: "http://127.0.0.1:9000".to_string(),
        s3_bucket: "videos".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_access_key: "access".to_string(),
        s3_secret_key: "secret".to_string(),
        s3_public_url: "http://127.0.0.1:9000/videos".to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
    }
}
