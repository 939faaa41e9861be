use utoipa::OpenApi;
use crate::common::response::{ErrorBody, JobResponse};
use crate::modules::media::dto::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::media::handler::repeat_videos,
        crate::modules::media::handler::combine_videos,
        crate::modules::media::handler::media_to_mp3,
    ),
    components(
        schemas(
            RepeatVideosRequest, RepeatVideoItem,
            CombineVideosRequest, CombineVideoItem,
            MediaToMp3Request,
            QueuedJobResponse, JobResponse, ErrorBody,
        )
    ),
    tags(
        (name = "Media", description = "Media processing jobs")
    ),
    security(
        ("api_key" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}
