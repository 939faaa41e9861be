use crate::common::response::JobResponse;
use crate::modules::media::model::MediaJob;
use crate::state::AppState;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use url::Url;

/// Posts finished job results to caller-supplied webhooks.
#[derive(Clone, Default)]
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn deliver(&self, url: &Url, payload: &JobResponse) -> Result<(), reqwest::Error> {
        self.client
            .post(url.clone())
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Run `job` in the background and deliver its result to the job's webhook.
/// Delivery is attempted once; failures are only logged.
pub fn spawn_job(state: AppState, endpoint: &'static str, job: MediaJob) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(job_id = %job.job_id, "📦 Processing {} job in background", endpoint);

        let result = state.jobs.run(&job).await;
        let payload = JobResponse::from_result(endpoint, &job, result);

        let Some(webhook_url) = job.webhook_url.as_ref() else {
            warn!(job_id = %job.job_id, "Background job finished without a webhook to notify");
            return;
        };

        match state.webhooks.deliver(webhook_url, &payload).await {
            Ok(()) => info!(job_id = %job.job_id, "Delivered result to {}", webhook_url),
            Err(e) => error!(job_id = %job.job_id, "Failed to deliver webhook to {}: {}", webhook_url, e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::test_config;
    use crate::modules::media::model::{JobKind, VideoSpec};
    use crate::modules::media::service::MediaService;
    use crate::modules::media::testing::{
        ConcatBehavior, FakeProcessor, FakeFetcher, FakeUploader, UploadBehavior,
    };
    use std::sync::Arc;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn job(webhook_url: Option<Url>) -> MediaJob {
        MediaJob {
            job_id: "job-hook".to_string(),
            kind: JobKind::Concat,
            videos: vec![VideoSpec {
                video_url: Url::parse("http://x/a.mp4").unwrap(),
                repeat_count: 2,
            }],
            webhook_url,
            id: Some("client-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_deliver_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({
                "code": 500,
                "endpoint": "/repeat-videos",
                "job_id": "job-hook"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/hook", server.uri())).unwrap();
        let payload = JobResponse::failure("/repeat-videos", &job(None), "boom".to_string());

        WebhookNotifier::default().deliver(&url, &payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_reports_rejected_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/hook", server.uri())).unwrap();
        let payload = JobResponse::failure("/repeat-videos", &job(None), "boom".to_string());

        assert!(WebhookNotifier::default().deliver(&url, &payload).await.is_err());
    }

    #[tokio::test]
    async fn test_spawned_job_delivers_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/done"))
            .and(body_partial_json(serde_json::json!({
                "code": 200,
                "endpoint": "/repeat-videos",
                "id": "client-1",
                "response": "https://cdn/out.mp4"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let jobs = MediaService::new(
            Arc::new(FakeFetcher::default()),
            Arc::new(FakeProcessor::new(ConcatBehavior::Concatenate)),
            Arc::new(FakeUploader::new(UploadBehavior::Url("https://cdn/out.mp4".to_string()))),
            dir.path(),
        );
        let state = AppState::new(test_config(dir.path().to_path_buf()), jobs, WebhookNotifier::default());
        let hook = Url::parse(&format!("{}/done", server.uri())).unwrap();

        spawn_job(state, "/repeat-videos", job(Some(hook))).await.unwrap();

        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
