use crate::config::settings::AppConfig;
use crate::modules::media::service::MediaService;
use crate::workers::webhook::WebhookNotifier;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub jobs: MediaService,
    pub webhooks: WebhookNotifier,
}

impl AppState {
    pub fn new(config: AppConfig, jobs: MediaService, webhooks: WebhookNotifier) -> Self {
        Self {
            config,
            jobs,
            webhooks,
        }
    }
}
