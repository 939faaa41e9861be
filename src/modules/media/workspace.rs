//! Per-job temporary files.
//!
//! Every path a job may create is derived up front from the job id, so the
//! cleanup sweep never has to discover anything.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct JobWorkspace {
    job_id: String,
    inputs: Vec<PathBuf>,
    manifest: PathBuf,
    output: PathBuf,
}

/// Extension of the last URL path segment, if it looks like a container suffix.
fn url_extension(url: &Url) -> Option<String> {
    let name = url.path_segments()?.next_back()?;
    let ext = Path::new(name).extension()?.to_str()?;
    let valid = !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

impl JobWorkspace {
    pub fn new<'a>(
        root: &Path,
        job_id: &str,
        sources: impl IntoIterator<Item = &'a Url>,
        output_extension: &str,
    ) -> Self {
        let inputs = sources
            .into_iter()
            .enumerate()
            .map(|(i, url)| {
                let stem = format!("{job_id}_input_{i}");
                match url_extension(url) {
                    Some(ext) => root.join(format!("{stem}.{ext}")),
                    None => root.join(stem),
                }
            })
            .collect();

        Self {
            job_id: job_id.to_string(),
            inputs,
            manifest: root.join(format!("{job_id}_concat_list.txt")),
            output: root.join(format!("{job_id}.{output_extension}")),
        }
    }

    /// Input destinations, one per source in request order.
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.inputs
            .iter()
            .chain([&self.manifest, &self.output])
            .map(PathBuf::as_path)
    }

    /// Remove every path that exists. Safe to call more than once.
    /// Returns how many files were removed.
    pub async fn cleanup(&self) -> usize {
        let mut removed = 0;
        for path in self.paths() {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                continue;
            }
            match tokio::fs::remove_file(path).await {
                Ok(()) => {
                    debug!(job_id = %self.job_id, path = %path.display(), "Removed temporary file");
                    removed += 1;
                }
                Err(e) => {
                    warn!(job_id = %self.job_id, path = %path.display(), "Failed to remove temporary file: {}", e);
                }
            }
        }
        removed
    }
}
