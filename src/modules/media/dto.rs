use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::model::{JobKind, MediaJob, VideoSpec};

// --- REPEAT DTOs ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RepeatVideoItem {
    #[validate(url(message = "video_url must be a valid URI"))]
    pub video_url: String,
    #[validate(range(min = 1, message = "repeat_count must be at least 1"))]
    pub repeat_count: u32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RepeatVideosRequest {
    #[validate(length(min = 1, message = "videos must contain at least one item"), nested)]
    pub videos: Vec<RepeatVideoItem>,
    #[validate(url(message = "webhook_url must be a valid URI"))]
    pub webhook_url: Option<String>,
    pub id: Option<String>,
}

// --- COMBINE DTOs ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CombineVideoItem {
    #[validate(url(message = "video_url must be a valid URI"))]
    pub video_url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CombineVideosRequest {
    #[validate(length(min = 1, message = "video_urls must contain at least one item"), nested)]
    pub video_urls: Vec<CombineVideoItem>,
    #[validate(url(message = "webhook_url must be a valid URI"))]
    pub webhook_url: Option<String>,
    pub id: Option<String>,
}

// --- MP3 DTOs ---

pub const DEFAULT_MP3_BITRATE: &str = "128k";

/// Bitrates look like `128k`: one to three digits and a `k` suffix.
fn validate_bitrate(bitrate: &str) -> Result<(), ValidationError> {
    let valid = bitrate
        .strip_suffix('k')
        .is_some_and(|n| (1..=3).contains(&n.len()) && n.chars().all(|c| c.is_ascii_digit()));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("bitrate").with_message("bitrate must look like 128k".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MediaToMp3Request {
    #[validate(url(message = "media_url must be a valid URI"))]
    pub media_url: String,
    /// Defaults to 128k.
    #[validate(custom(function = "validate_bitrate"))]
    pub bitrate: Option<String>,
    #[validate(url(message = "webhook_url must be a valid URI"))]
    pub webhook_url: Option<String>,
    pub id: Option<String>,
}

/// Immediate answer for jobs whose result goes to a webhook.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueuedJobResponse {
    pub job_id: String,
    pub id: Option<String>,
    pub message: String,
}

fn parse_url(raw: &str, field: &'static str) -> Result<Url, ValidationErrors> {
    Url::parse(raw).map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add(field, ValidationError::new("url"));
        errors
    })
}

fn parse_webhook(raw: Option<&str>) -> Result<Option<Url>, ValidationErrors> {
    raw.map(|u| parse_url(u, "webhook_url")).transpose()
}

fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

impl RepeatVideosRequest {
    /// Validate and turn the request into a job with a fresh id.
    pub fn into_job(self) -> Result<MediaJob, ValidationErrors> {
        self.validate()?;

        let videos = self
            .videos
            .iter()
            .map(|item| {
                Ok(VideoSpec {
                    video_url: parse_url(&item.video_url, "video_url")?,
                    repeat_count: item.repeat_count,
                })
            })
            .collect::<Result<Vec<_>, ValidationErrors>>()?;

        Ok(MediaJob {
            job_id: new_job_id(),
            kind: JobKind::Concat,
            videos,
            webhook_url: parse_webhook(self.webhook_url.as_deref())?,
            id: self.id,
        })
    }
}

impl CombineVideosRequest {
    /// A combine job is a repeat job with every count set to one.
    pub fn into_job(self) -> Result<MediaJob, ValidationErrors> {
        self.validate()?;

        let videos = self
            .video_urls
            .iter()
            .map(|item| {
                Ok(VideoSpec {
                    video_url: parse_url(&item.video_url, "video_url")?,
                    repeat_count: 1,
                })
            })
            .collect::<Result<Vec<_>, ValidationErrors>>()?;

        Ok(MediaJob {
            job_id: new_job_id(),
            kind: JobKind::Concat,
            videos,
            webhook_url: parse_webhook(self.webhook_url.as_deref())?,
            id: self.id,
        })
    }
}

impl MediaToMp3Request {
    pub fn into_job(self) -> Result<MediaJob, ValidationErrors> {
        self.validate()?;

        Ok(MediaJob {
            job_id: new_job_id(),
            kind: JobKind::Mp3 {
                bitrate: self.bitrate.unwrap_or_else(|| DEFAULT_MP3_BITRATE.to_string()),
            },
            videos: vec![VideoSpec {
                video_url: parse_url(&self.media_url, "media_url")?,
                repeat_count: 1,
            }],
            webhook_url: parse_webhook(self.webhook_url.as_deref())?,
            id: self.id,
        })
    }
}
