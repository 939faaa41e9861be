use std::path::PathBuf;

use url::Url;

/// One requested input: a remote video and how many times it plays back to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSpec {
    pub video_url: Url,
    pub repeat_count: u32,
}

/// What a job produces from its downloaded inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    /// Stream-copy concat of every input, each repeated in place.
    Concat,
    /// Audio-only transcode of the single input.
    Mp3 { bitrate: String },
}

impl JobKind {
    pub fn output_extension(&self) -> &'static str {
        match self {
            JobKind::Concat => "mp4",
            JobKind::Mp3 { .. } => "mp3",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaJob {
    pub job_id: String,
    pub kind: JobKind,
    pub videos: Vec<VideoSpec>,
    pub webhook_url: Option<Url>,
    /// Caller-supplied correlation id, echoed back untouched.
    pub id: Option<String>,
}

/// A downloaded input on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    pub path: PathBuf,
    pub repeat_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Downloading,
    Manifesting,
    Concatenating,
    Transcoding,
    VerifyingOutput,
    Uploading,
    CleaningUp,
    Done,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Downloading => "DOWNLOADING",
            JobStage::Manifesting => "MANIFESTING",
            JobStage::Concatenating => "CONCATENATING",
            JobStage::Transcoding => "TRANSCODING",
            JobStage::VerifyingOutput => "VERIFYING_OUTPUT",
            JobStage::Uploading => "UPLOADING",
            JobStage::CleaningUp => "CLEANING_UP",
            JobStage::Done => "DONE",
        }
    }
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
