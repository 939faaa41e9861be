use crate::common::response::{ApiError, JobResponse};
use crate::modules::media::dto::*;
use crate::modules::media::model::MediaJob;
use crate::state::AppState;
use crate::workers::webhook;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

pub const REPEAT_ENDPOINT: &str = "/repeat-videos";
pub const COMBINE_ENDPOINT: &str = "/combine-videos";
pub const MP3_ENDPOINT: &str = "/media-to-mp3";

/// Run a job inline, or hand it to the webhook worker when a webhook is set.
async fn dispatch(state: AppState, endpoint: &'static str, job: MediaJob) -> Response {
    if job.webhook_url.is_some() {
        let queued = QueuedJobResponse {
            job_id: job.job_id.clone(),
            id: job.id.clone(),
            message: "processing".to_string(),
        };
        webhook::spawn_job(state, endpoint, job);
        return (StatusCode::ACCEPTED, Json(queued)).into_response();
    }

    let result = state.jobs.run(&job).await;
    JobResponse::from_result(endpoint, &job, result).into_response()
}

/// Repeat each video the requested number of times and concatenate them
#[utoipa::path(
    post,
    path = "/repeat-videos",
    request_body = RepeatVideosRequest,
    responses(
        (status = 200, description = "Uploaded output URL", body = JobResponse),
        (status = 202, description = "Queued; result is delivered to webhook_url", body = QueuedJobResponse),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Processing failed", body = JobResponse)
    ),
    tag = "Media",
    security(("api_key" = []))
)]
pub async fn repeat_videos(
    State(state): State<AppState>,
    payload: Result<Json<RepeatVideosRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError(e.body_text(), StatusCode::BAD_REQUEST))?;
    let job = req
        .into_job()
        .map_err(|e| ApiError(e.to_string(), StatusCode::BAD_REQUEST))?;

    info!(job_id = %job.job_id, "Received repeat-videos request for {} videos", job.videos.len());
    Ok(dispatch(state, REPEAT_ENDPOINT, job).await)
}

/// Concatenate videos once each, in order
#[utoipa::path(
    post,
    path = "/combine-videos",
    request_body = CombineVideosRequest,
    responses(
        (status = 200, description = "Uploaded output URL", body = JobResponse),
        (status = 202, description = "Queued; result is delivered to webhook_url", body = QueuedJobResponse),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Processing failed", body = JobResponse)
    ),
    tag = "Media",
    security(("api_key" = []))
)]
pub async fn combine_videos(
    State(state): State<AppState>,
    payload: Result<Json<CombineVideosRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError(e.body_text(), StatusCode::BAD_REQUEST))?;
    let job = req
        .into_job()
        .map_err(|e| ApiError(e.to_string(), StatusCode::BAD_REQUEST))?;

    info!(job_id = %job.job_id, "Received combine-videos request for {} videos", job.videos.len());
    Ok(dispatch(state, COMBINE_ENDPOINT, job).await)
}

/// Convert a media file to MP3 at the requested bitrate
#[utoipa::path(
    post,
    path = "/media-to-mp3",
    request_body = MediaToMp3Request,
    responses(
        (status = 200, description = "Uploaded output URL", body = JobResponse),
        (status = 202, description = "Queued; result is delivered to webhook_url", body = QueuedJobResponse),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Processing failed", body = JobResponse)
    ),
    tag = "Media",
    security(("api_key" = []))
)]
pub async fn media_to_mp3(
    State(state): State<AppState>,
    payload: Result<Json<MediaToMp3Request>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError(e.body_text(), StatusCode::BAD_REQUEST))?;
    let job = req
        .into_job()
        .map_err(|e| ApiError(e.to_string(), StatusCode::BAD_REQUEST))?;

    info!(job_id = %job.job_id, "Received media-to-mp3 request");
    Ok(dispatch(state, MP3_ENDPOINT, job).await)
}
