//! Per-user thumbnail store.
//!
//! Keyed by Telegram user id, value is a normalized JPEG on disk. Incoming
//! images are format-detected by magic bytes and squeezed through ffmpeg to
//! meet Telegram's thumbnail constraints (JPEG, at most 320 px, under 200 KB).

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;

use crate::core::config;
use crate::core::error::AppError;
use crate::core::process::{run_with_timeout, FFMPEG_TIMEOUT};

/// Image format detected from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Unknown,
}

/// Detects an image format from the first bytes of a file.
///
/// # Arguments
///
/// * `bytes` - The first bytes of the image file (at least 12 bytes for WebP)
pub fn detect_image_format(bytes: &[u8]) -> ImageFormat {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => ImageFormat::Jpeg,
        [0x89, b'P', b'N', b'G', ..] => ImageFormat::Png,
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => ImageFormat::WebP,
        _ => ImageFormat::Unknown,
    }
}

/// Filesystem-backed store of one thumbnail per user.
#[derive(Debug, Clone)]
pub struct ThumbStore {
    dir: PathBuf,
}

impl ThumbStore {
    /// Creates a store rooted at an explicit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store rooted at the configured thumbnail folder.
    pub fn open_default() -> Self {
        Self::new(config::expand_path(&config::THUMBNAIL_FOLDER))
    }

    /// Canonical path of a user's thumbnail, whether or not it exists yet.
    pub fn path_for(&self, user_id: i64) -> PathBuf {
        self.dir.join(format!("{}.jpg", user_id))
    }

    /// Returns the stored thumbnail path, if the user has one.
    pub async fn get(&self, user_id: i64) -> Option<PathBuf> {
        let path = self.path_for(user_id);
        match fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }

    /// Normalizes and persists an image as the user's thumbnail.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Telegram user id the thumbnail belongs to
    /// * `bytes` - Raw image bytes as received from the chat
    ///
    /// # Returns
    ///
    /// The path of the stored JPEG.
    pub async fn store(&self, user_id: i64, bytes: &[u8]) -> Result<PathBuf, AppError> {
        let format = detect_image_format(bytes);
        if format == ImageFormat::Unknown {
            return Err(AppError::Validation(
                "Unsupported image format, send a JPEG, PNG or WebP photo".to_string(),
            ));
        }

        fs::create_dir_all(&self.dir).await?;

        let raw_path = self.dir.join(format!("{}.src", user_id));
        fs::write(&raw_path, bytes).await?;

        let final_path = self.path_for(user_id);
        let result = normalize_to_jpeg(&raw_path, &final_path).await;

        let _ = fs::remove_file(&raw_path).await;
        result?;

        let stored_size = fs::metadata(&final_path).await?.len();
        if stored_size > config::limits::THUMBNAIL_MAX_BYTES {
            log::warn!(
                "Thumbnail for user {} is {} bytes, above Telegram's {} byte limit; it may be ignored",
                user_id,
                stored_size,
                config::limits::THUMBNAIL_MAX_BYTES
            );
        }

        Ok(final_path)
    }

    /// Removes the user's thumbnail. Returns whether one existed.
    pub async fn delete(&self, user_id: i64) -> Result<bool, AppError> {
        match fs::remove_file(self.path_for(user_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Re-encodes an image as a Telegram-sized JPEG via ffmpeg.
///
/// Both paths are passed as discrete arguments; the scale filter shrinks the
/// longer side to the 320 px limit without upscaling small images.
async fn normalize_to_jpeg(input: &Path, output: &Path) -> Result<(), AppError> {
    let max_side = config::limits::THUMBNAIL_MAX_SIDE;
    let scale = format!(
        "scale=w=min({side}\\,iw):h=min({side}\\,ih):force_original_aspect_ratio=decrease",
        side = max_side
    );

    let output_result = run_with_timeout(
        Command::new(&*config::FFMPEG_BIN)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vf")
            .arg(&scale)
            .arg("-q:v")
            .arg("2")
            .arg(output),
        FFMPEG_TIMEOUT,
    )
    .await?;

    if !output_result.status.success() {
        let stderr = String::from_utf8_lossy(&output_result.stderr);
        return Err(AppError::Probe(format!("ffmpeg conversion failed: {}", stderr.trim())));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_image_format() {
        assert_eq!(detect_image_format(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
        assert_eq!(detect_image_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]), ImageFormat::Png);
        assert_eq!(detect_image_format(b"RIFF\x10\x00\x00\x00WEBPVP8 "), ImageFormat::WebP);

        assert_eq!(detect_image_format(b"GIF89a"), ImageFormat::Unknown);
        assert_eq!(detect_image_format(&[]), ImageFormat::Unknown);
        assert_eq!(detect_image_format(&[0xFF, 0xD8]), ImageFormat::Unknown);
    }

    #[test]
    fn test_path_for_is_per_user() {
        let store = ThumbStore::new("/tmp/thumbs");
        assert_eq!(store.path_for(42), PathBuf::from("/tmp/thumbs/42.jpg"));
        assert_ne!(store.path_for(1), store.path_for(2));
    }

    #[tokio::test]
    async fn test_store_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThumbStore::new(dir.path());

        let result = store.store(7, b"definitely not an image").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThumbStore::new(dir.path());

        assert!(!store.delete(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThumbStore::new(dir.path());

        assert!(store.get(7).await.is_none());
    }
}
