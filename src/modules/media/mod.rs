use axum::Router;
use axum::middleware;
use axum::routing::post;
use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod handler;
pub mod manifest;
pub mod model;
pub mod service;
pub mod workspace;

#[cfg(test)]
pub mod testing;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(handler::REPEAT_ENDPOINT, post(handler::repeat_videos))
        .route(handler::COMBINE_ENDPOINT, post(handler::combine_videos))
        .route(handler::MP3_ENDPOINT, post(handler::media_to_mp3))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::api_key_middleware,
        ))
}
