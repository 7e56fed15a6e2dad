//! Process execution utilities with timeout support
//!
//! Provides helpers for running external processes (mediainfo, ffmpeg)
//! with configurable timeouts to prevent hung processes from blocking the pipeline.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::core::error::AppError;

/// Default timeout for mediainfo inspection (1 minute)
pub const MEDIAINFO_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for ffmpeg thumbnail conversions (30 seconds)
pub const FFMPEG_TIMEOUT: Duration = Duration::from_secs(30);

/// Run an async Command with a timeout.
///
/// Returns the process Output on success, or an AppError on timeout/IO failure.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, AppError> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(AppError::Io(e)),
        Err(_) => Err(AppError::Probe(format!(
            "Process timed out after {}s",
            timeout.as_secs()
        ))),
    }
}
