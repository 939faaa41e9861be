//! Concat-demuxer manifest for repeated inputs.
//!
//! Each asset contributes `repeat_count` consecutive `file '<abs path>'`
//! lines, in input order, so the output plays asset 0 N times, then asset 1,
//! and so on.

use std::path::{Path, PathBuf};

use super::model::LocalAsset;

/// Quote a path for the concat demuxer. A `'` closes the quoted string,
/// emits an escaped quote and reopens it.
fn quote_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn render(assets: &[LocalAsset]) -> String {
    let mut body = String::new();
    for asset in assets {
        let line = format!("file {}\n", quote_path(&absolute(&asset.path)));
        for _ in 0..asset.repeat_count {
            body.push_str(&line);
        }
    }
    body
}

pub async fn write(path: &Path, assets: &[LocalAsset]) -> std::io::Result<()> {
    tokio::fs::write(path, render(assets)).await
}
