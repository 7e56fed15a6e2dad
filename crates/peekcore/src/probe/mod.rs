//! External `mediainfo` invocation.
//!
//! The binary path comes from configuration and the target path is always
//! passed as a discrete argument, never interpolated into a shell string.

use std::path::Path;
use tokio::process::Command;

use crate::core::config;
use crate::core::error::AppError;
use crate::core::process::{run_with_timeout, MEDIAINFO_TIMEOUT};

/// Runs mediainfo against a local file and returns its stdout.
///
/// # Arguments
///
/// * `path` - The file to inspect (typically a truncated prefix of the
///   original media)
///
/// # Returns
///
/// The raw report text on success. A non-zero exit status or empty output is
/// an error here - the formatter downstream only ever sees usable text.
pub async fn run_mediainfo(path: &Path) -> Result<String, AppError> {
    let mediainfo_bin = &*config::MEDIAINFO_BIN;

    let output = run_with_timeout(Command::new(mediainfo_bin).arg(path), MEDIAINFO_TIMEOUT).await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::Probe(format!(
            "mediainfo exited with {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    let report = String::from_utf8_lossy(&output.stdout).to_string();
    if report.trim().is_empty() {
        return Err(AppError::Probe("mediainfo produced no output".to_string()));
    }

    Ok(report)
}

/// Returns the installed mediainfo version string.
///
/// Used as a startup check: a missing or broken binary fails here, before
/// the bot starts accepting requests.
pub async fn mediainfo_version() -> Result<String, AppError> {
    let mediainfo_bin = &*config::MEDIAINFO_BIN;

    let output = Command::new(mediainfo_bin)
        .arg("--Version")
        .output()
        .await
        .map_err(|e| AppError::Probe(format!("Failed to run {} --Version: {}", mediainfo_bin, e)))?;

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if version.is_empty() {
        return Err(AppError::Probe(
            "mediainfo is not installed or --Version produced no output".to_string(),
        ));
    }

    Ok(version)
}
