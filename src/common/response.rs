use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::media::error::JobResult;
use crate::modules::media::model::MediaJob;

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
}

/// Outcome of a finished job: the `(result, endpoint, code)` triple plus ids.
/// Returned inline or POSTed to the job's webhook.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub code: u16,
    pub endpoint: String,
    pub job_id: String,
    pub id: Option<String>,
    /// Public URL of the output on success.
    pub response: Option<String>,
    pub message: String,
}

impl JobResponse {
    pub fn success(endpoint: &str, job: &MediaJob, url: String) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            endpoint: endpoint.to_string(),
            job_id: job.job_id.clone(),
            id: job.id.clone(),
            response: Some(url),
            message: "success".to_string(),
        }
    }

    pub fn failure(endpoint: &str, job: &MediaJob, message: String) -> Self {
        Self {
            code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            endpoint: endpoint.to_string(),
            job_id: job.job_id.clone(),
            id: job.id.clone(),
            response: None,
            message,
        }
    }

    /// Every job error collapses to a 500 carrying its message.
    pub fn from_result(endpoint: &str, job: &MediaJob, result: JobResult<String>) -> Self {
        match result {
            Ok(url) => Self::success(endpoint, job, url),
            Err(e) => Self::failure(endpoint, job, e.to_string()),
        }
    }
}

impl IntoResponse for JobResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub struct ApiError(pub String, pub StatusCode);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status) = (self.0, self.1);
        let body = ErrorBody {
            status: "error".to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
