use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::settings::AppConfig;
use crate::infrastructure::http::fetcher::HttpFetcher;
use crate::infrastructure::media::ffmpeg::{FfmpegRunner, check_ffmpeg};
use crate::infrastructure::storage::s3::StorageService;
use crate::modules::media::service::MediaService;
use crate::state::AppState;
use crate::workers::webhook::WebhookNotifier;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod middleware;
mod modules;
mod routes;
mod state;
mod workers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    // Storage is mandatory: a missing bucket stops startup instead of failing each job.
    let config = AppConfig::new().context("invalid configuration")?;

    match check_ffmpeg(&config.ffmpeg_path) {
        Ok(path) => info!("Using ffmpeg at {}", path.display()),
        Err(e) => warn!("ffmpeg '{}' not found: {}", config.ffmpeg_path, e),
    }

    tokio::fs::create_dir_all(&config.storage_path)
        .await
        .with_context(|| format!("cannot create storage path {}", config.storage_path.display()))?;

    let client = reqwest::Client::new();
    let jobs = MediaService::new(
        Arc::new(HttpFetcher::new(client.clone())),
        Arc::new(FfmpegRunner::new(config.ffmpeg_path.clone())),
        Arc::new(StorageService::from_config(&config)),
        config.storage_path.clone(),
    );

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = AppState::new(config, jobs, WebhookNotifier::new(client));
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
