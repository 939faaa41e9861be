use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::modules::media::service::MediaFetcher;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to write local file: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads remote media over HTTP(S) into a local file.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Stream `url` into `dest`. Non-2xx responses are errors.
    pub async fn download(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }

        let response = self.client.get(url.clone()).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("Wrote {} bytes from {} to {}", written, url, dest.display());
        Ok(written)
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        let bytes = self.download(url, dest).await?;
        info!("⬇️ Downloaded {} bytes from {}", bytes, url);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_writes_exact_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x00\x01video-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("job_input_0.mp4");
        let url = Url::parse(&format!("{}/a.mp4", server.uri())).unwrap();

        let written = HttpFetcher::default().fetch(&url, &dest).await.unwrap();

        assert_eq!(written, 13);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"\x00\x01video-bytes");
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing.mp4");
        let url = Url::parse(&format!("{}/missing.mp4", server.uri())).unwrap();

        let err = HttpFetcher::default().fetch(&url, &dest).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let dir = TempDir::new().unwrap();
        let url = Url::parse("ftp://example.com/a.mp4").unwrap();

        let err = HttpFetcher::default()
            .fetch(&url, &dir.path().join("a.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[tokio::test]
    async fn test_fetch_reports_unwritable_destination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("no-such-dir").join("a.mp4");
        let url = Url::parse(&format!("{}/a.mp4", server.uri())).unwrap();

        let err = HttpFetcher::default().fetch(&url, &dest).await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
