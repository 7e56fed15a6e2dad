//! MediaPeek core - report formatting and media inspection plumbing
//!
//! This library provides all the non-Telegram functionality for the MediaPeek
//! bot: running MediaInfo against local files, formatting its output into a
//! publishable fragment, fetching URL prefixes, publishing pages to Telegraph,
//! and caching per-user thumbnails.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, process helpers, health server
//! - `report`: MediaInfo report formatter (text -> markup fragment)
//! - `probe`: External `mediainfo` invocation
//! - `fetch`: Capped prefix downloads over HTTP
//! - `publish`: Telegraph page publishing
//! - `thumbs`: Per-user thumbnail store

pub mod core;
pub mod fetch;
pub mod probe;
pub mod publish;
pub mod report;
pub mod thumbs;

// Re-export commonly used types for convenience
pub use crate::core::error::{AppError, AppResult};
pub use crate::core::{config, init_logger, log_startup_configuration};
pub use crate::fetch::{download_prefix, FetchProgress, FetchedPrefix};
pub use crate::publish::TelegraphClient;
pub use crate::report::{format_report, FormatOptions};
pub use crate::thumbs::ThumbStore;
