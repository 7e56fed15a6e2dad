//! Capped prefix downloads over HTTP.
//!
//! MediaInfo only needs the leading bytes of a container, so URL downloads
//! stop at a configurable cap and the resource's real size is carried
//! alongside the partial file as the byte-size hint for the formatter.

use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::core::error::AppError;
use crate::core::utils::escape_filename;

/// Browser-like user agent; some file hosts refuse requests without one.
const USER_AGENT: &str = "Mozilla/5.0";

/// Progress update emitted while a prefix download runs.
#[derive(Debug, Clone, Copy)]
pub struct FetchProgress {
    /// Bytes written so far.
    pub downloaded: u64,
    /// Bytes this fetch is going to write (Content-Length capped at the
    /// prefix limit), when the server told us.
    pub expected: Option<u64>,
}

impl FetchProgress {
    /// Completion percentage, when the expected size is known.
    pub fn percent(&self) -> Option<u64> {
        self.expected.filter(|e| *e > 0).map(|e| (self.downloaded * 100 / e).min(100))
    }
}

/// Result of a prefix download.
#[derive(Debug)]
pub struct FetchedPrefix {
    /// Where the prefix was written.
    pub path: PathBuf,
    /// Bytes actually written (at most the cap).
    pub bytes_written: u64,
    /// Full size of the remote resource per Content-Length, when known.
    /// This is the authoritative size fed to the report formatter.
    pub total_size: Option<u64>,
}

/// Extracts a safe local file name from the last path segment of a URL.
///
/// The original resource name is kept (sanitized) so the report page title
/// and the inspected file match what the user sent.
pub fn filename_from_url(url: &Url) -> Result<String, AppError> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(escape_filename)
        .ok_or_else(|| AppError::Validation(format!("Cannot extract a file name from {}", url)))
}

/// Downloads up to `cap` bytes of `url` into `dest_dir`.
///
/// Progress updates are pushed through `progress` per received chunk; the
/// consumer decides how often to surface them. The download ends cleanly
/// once the cap is reached, leaving a valid truncated prefix on disk.
pub async fn download_prefix(
    client: &reqwest::Client,
    url: &Url,
    dest_dir: &Path,
    cap: u64,
    progress: Option<UnboundedSender<FetchProgress>>,
) -> Result<FetchedPrefix, AppError> {
    let filename = filename_from_url(url)?;

    fs::create_dir_all(dest_dir).await?;
    let path = dest_dir.join(&filename);

    let response = client
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::HttpStatus(response.status()));
    }

    let total_size = response.content_length();
    let expected = total_size.map(|t| t.min(cap));

    let mut file = fs::File::create(&path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let remaining = (cap - downloaded) as usize;
        let slice = if chunk.len() > remaining {
            &chunk[..remaining]
        } else {
            &chunk[..]
        };

        file.write_all(slice).await?;
        downloaded += slice.len() as u64;

        if let Some(tx) = &progress {
            let _ = tx.send(FetchProgress { downloaded, expected });
        }

        if downloaded >= cap {
            log::info!("Prefix cap of {} bytes reached for {}, stopping download", cap, url);
            break;
        }
    }

    file.flush().await?;

    Ok(FetchedPrefix {
        path,
        bytes_written: downloaded,
        total_size,
    })
}
