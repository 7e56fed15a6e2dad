use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot

/// Cached mediainfo binary path
/// Read once at startup from MEDIAINFO_BIN environment variable or defaults to "mediainfo"
pub static MEDIAINFO_BIN: Lazy<String> =
    Lazy::new(|| env::var("MEDIAINFO_BIN").unwrap_or_else(|_| "mediainfo".to_string()));

/// ffmpeg binary path used for thumbnail normalization
/// Read from FFMPEG_BIN environment variable, defaults to "ffmpeg"
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Download folder path for partial files awaiting inspection
/// Read from DOWNLOAD_FOLDER environment variable
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "~/downloads/mediapeek".to_string()));

/// Folder holding cached per-user thumbnails
pub static THUMBNAIL_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("THUMBNAIL_FOLDER").unwrap_or_else(|_| "~/downloads/mediapeek/thumbs".to_string()));

/// Telegraph access token for page publishing
/// If unset, an anonymous account is created lazily on first publish
pub static TELEGRAPH_ACCESS_TOKEN: Lazy<Option<String>> = Lazy::new(|| env::var("TELEGRAPH_ACCESS_TOKEN").ok());

/// Log file path
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "mediapeek.log".to_string()));

/// Expands a configured path, resolving a leading tilde to the home directory.
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}

/// Download limits
pub mod limits {
    /// Maximum number of bytes fetched from a URL before inspection.
    ///
    /// MediaInfo only needs the leading part of a container to identify its
    /// streams, so downloads are cut off here and the real size is taken from
    /// the Content-Length header instead.
    pub const MAX_PROBE_BYTES: u64 = 50 * 1024 * 1024; // 50 MiB

    /// Maximum file size the standard Bot API will serve via getFile (20 MB)
    pub const BOT_API_FILE_LIMIT_BYTES: u64 = 20 * 1024 * 1024;

    /// Telegram caps custom thumbnails at 200 KB and 320 px
    pub const THUMBNAIL_MAX_BYTES: u64 = 200 * 1024;
    pub const THUMBNAIL_MAX_SIDE: u32 = 320;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for HTTP requests (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Timeout for Telegraph API calls (in seconds)
    pub const TELEGRAPH_TIMEOUT_SECS: u64 = 15;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Telegraph timeout duration
    pub fn telegraph_timeout() -> Duration {
        Duration::from_secs(TELEGRAPH_TIMEOUT_SECS)
    }
}

/// Health/keep-alive web server configuration
pub mod web {
    /// Port for the health endpoint, from WEB_PORT, default 8080
    pub fn port() -> u16 {
        std::env::var("WEB_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080)
    }
}

/// Progress message configuration
pub mod progress {
    /// Minimum percent step between two progress edits of the status message
    pub const EDIT_STEP_PERCENT: u64 = 10;
}
