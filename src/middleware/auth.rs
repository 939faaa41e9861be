use crate::state::AppState;
use crate::common::response::ApiError;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn api_key_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == state.config.api_key => Ok(next.run(req).await),
        Some(_) => Err(ApiError("Unauthorized: Invalid API key".to_string(), StatusCode::UNAUTHORIZED)),
        None => Err(ApiError("Unauthorized: Missing API key".to_string(), StatusCode::UNAUTHORIZED)),
    }
}
