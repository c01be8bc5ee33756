// src/download.rs
// =============================================================================
// Saves one image to disk.
//
// How it works:
// 1. Derive the file name from the last segment of the image URL
// 2. GET the image while holding an in-flight slot
// 3. Stream the body into a hidden ".<name>.part" file next to the target
// 4. Flush, then rename the part file onto the real name
//
// If anything fails along the way the part file is removed, so a file with
// the final name on disk is always a complete download. There is no resume:
// every attempt starts from scratch.
// =============================================================================

use crate::error::GrabError;
use crate::fetch::Fetcher;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;
use url::Url;

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub path: PathBuf,
    pub bytes: u64,
}

/// The file name an image URL is saved under: its last path segment.
pub fn file_name_from_url(url: &Url) -> Result<String, GrabError> {
    let name = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("");

    // Segments come percent-encoded; keep them that way but refuse anything
    // that would escape the output directory
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(GrabError::invalid_url(url.as_str(), "no file name in URL path"));
    }

    Ok(name.to_string())
}

/// Downloads `url` into `path`.
pub async fn download_to(fetcher: &Fetcher, url: &Url, path: &Path) -> Result<SavedImage, GrabError> {
    let part = part_path(path);

    let result = fetch_into(fetcher, url, &part).await;
    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %part.display(), "removing partial file");
            let _ = fs::remove_file(&part).await;
            return Err(e);
        }
    };

    if let Err(e) = fs::rename(&part, path).await {
        let _ = fs::remove_file(&part).await;
        return Err(GrabError::filesystem(path, e));
    }

    Ok(SavedImage {
        path: path.to_path_buf(),
        bytes,
    })
}

async fn fetch_into(fetcher: &Fetcher, url: &Url, part: &Path) -> Result<u64, GrabError> {
    let _permit = fetcher.permit().await;
    let response = fetcher.get(url.as_str()).await?;

    let file = File::create(part)
        .await
        .map_err(|e| GrabError::filesystem(part, e))?;
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| GrabError::from_reqwest(url.as_str(), e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| GrabError::filesystem(part, e))?;
        written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| GrabError::filesystem(part, e))?;

    Ok(written)
}

// nebula.jpg -> .nebula.jpg.part
fn part_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.part"))
}
