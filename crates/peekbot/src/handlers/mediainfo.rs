//! The MediaInfo pipeline: fetch, probe, format, publish.
//!
//! One request walks through four stages: the target (URL or chat attachment)
//! is materialized as a partial file on disk, mediainfo inspects it, the
//! formatter turns the report into a fragment with the authoritative byte
//! size, and the fragment is published to Telegraph. The status message sent
//! at the start is edited in place at every stage and ends up as either the
//! report link or a single failure report.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileMeta, MessageId, ParseMode, ReplyParameters};
use tokio::sync::mpsc;
use url::Url;

use peekcore::core::config;
use peekcore::core::error::{AppError, AppResult};
use peekcore::core::utils::{escape_filename, escape_html, format_size};
use peekcore::fetch::{download_prefix, filename_from_url, FetchProgress};
use peekcore::probe::run_mediainfo;
use peekcore::publish::TelegraphClient;
use peekcore::report::{format_report, FormatOptions};

use super::types::HandlerDeps;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid URL pattern"));

/// A media attachment a report can be generated for.
#[derive(Clone)]
pub struct MediaRef {
    pub file: FileMeta,
    pub file_name: String,
}

impl MediaRef {
    fn new(file: &FileMeta, file_name: Option<String>, fallback: &str) -> Self {
        Self {
            file: file.clone(),
            file_name: file_name.unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// What the pipeline is pointed at.
pub enum ProbeTarget {
    Link(Url),
    Media(MediaRef),
}

/// Picks the first inspectable attachment from a message.
///
/// Candidate order matches the original bot: document, video, audio, voice,
/// animation, video note.
pub fn find_media(msg: &Message) -> Option<MediaRef> {
    if let Some(doc) = msg.document() {
        return Some(MediaRef::new(&doc.file, doc.file_name.clone(), "document.bin"));
    }
    if let Some(video) = msg.video() {
        return Some(MediaRef::new(&video.file, video.file_name.clone(), "video.mp4"));
    }
    if let Some(audio) = msg.audio() {
        return Some(MediaRef::new(&audio.file, audio.file_name.clone(), "audio.mp3"));
    }
    if let Some(voice) = msg.voice() {
        return Some(MediaRef::new(&voice.file, None, "voice.ogg"));
    }
    if let Some(animation) = msg.animation() {
        return Some(MediaRef::new(&animation.file, animation.file_name.clone(), "animation.mp4"));
    }
    if let Some(note) = msg.video_note() {
        return Some(MediaRef::new(&note.file, None, "video_note.mp4"));
    }
    None
}

/// Extracts the first http(s) link from a text, if it parses as a URL.
pub fn find_link(text: &str) -> Option<Url> {
    let candidate = URL_PATTERN.find(text)?;
    Url::parse(candidate.as_str()).ok()
}

/// Runs the full pipeline for one request and reports the outcome into the chat.
pub async fn handle_mediainfo_request(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    target: ProbeTarget,
) -> AppResult<()> {
    let status = bot
        .send_message(msg.chat.id, "⏳ Gathering MediaInfo...")
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    match run_pipeline(bot, msg.chat.id, status.id, deps, target).await {
        Ok(Some((title, page_url))) => {
            bot.edit_message_text(
                msg.chat.id,
                status.id,
                format!(
                    "📋 <b>{}</b>\n\n<a href=\"{}\">Open full report</a>",
                    escape_html(&title),
                    page_url
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
        Ok(None) => {
            bot.edit_message_text(
                msg.chat.id,
                status.id,
                "😕 No video or audio streams found in this file.",
            )
            .await?;
        }
        Err(e) => {
            log::error!("MediaInfo pipeline failed for chat {}: {}", msg.chat.id, e);
            bot.edit_message_text(msg.chat.id, status.id, format!("❌ MediaInfo stopped: {}", e))
                .await?;
        }
    }

    Ok(())
}

/// Fetch, probe, format, publish. Returns the page title and URL, or `None`
/// when the report carries no usable metadata.
async fn run_pipeline(
    bot: &Bot,
    chat_id: ChatId,
    status_id: MessageId,
    deps: &HandlerDeps,
    target: ProbeTarget,
) -> Result<Option<(String, String)>, AppError> {
    let download_dir = PathBuf::from(config::expand_path(&config::DOWNLOAD_FOLDER));

    let (path, byte_size, title) = match target {
        ProbeTarget::Link(url) => fetch_link(bot, chat_id, status_id, deps, &url, &download_dir).await?,
        ProbeTarget::Media(media) => fetch_media(bot, &media, &download_dir).await?,
    };

    let result = probe_and_publish(&deps.telegraph, &path, byte_size, &title).await;

    // The partial file is removed on success and failure alike
    if let Err(e) = tokio::fs::remove_file(&path).await {
        log::warn!("Failed to remove {}: {}", path.display(), e);
    }

    result.map(|page_url| page_url.map(|url| (title, url)))
}

/// Downloads a URL prefix, editing the status message at 10% steps.
async fn fetch_link(
    bot: &Bot,
    chat_id: ChatId,
    status_id: MessageId,
    deps: &HandlerDeps,
    url: &Url,
    dir: &Path,
) -> Result<(PathBuf, u64, String), AppError> {
    let title = filename_from_url(url)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<FetchProgress>();
    let progress_bot = bot.clone();
    let reporter = tokio::spawn(async move {
        let mut last_step: u64 = 0;
        while let Some(update) = rx.recv().await {
            if let Some(percent) = update.percent() {
                if percent > last_step
                    && (percent == 100 || percent - last_step >= config::progress::EDIT_STEP_PERCENT)
                {
                    last_step = percent;
                    let _ = progress_bot
                        .edit_message_text(chat_id, status_id, format!("⬇️ Downloading... {}%", percent))
                        .await;
                }
            }
        }
    });

    let fetched = download_prefix(&deps.http, url, dir, config::limits::MAX_PROBE_BYTES, Some(tx)).await;
    // The sender is gone once download_prefix returns, so the reporter drains and exits
    let _ = reporter.await;
    let fetched = fetched?;

    // Content-Length is the real size; the file on disk may be just a prefix
    let byte_size = fetched.total_size.unwrap_or(fetched.bytes_written);

    Ok((fetched.path, byte_size, title))
}

/// Downloads a chat attachment through the Bot API.
async fn fetch_media(bot: &Bot, media: &MediaRef, dir: &Path) -> Result<(PathBuf, u64, String), AppError> {
    let byte_size = u64::from(media.file.size);
    if byte_size > config::limits::BOT_API_FILE_LIMIT_BYTES {
        return Err(AppError::Validation(format!(
            "File is {}, above the {} the Bot API can serve",
            format_size(byte_size),
            format_size(config::limits::BOT_API_FILE_LIMIT_BYTES)
        )));
    }

    let file = bot.get_file(media.file.id.clone()).await?;

    tokio::fs::create_dir_all(dir).await?;
    let title = escape_filename(&media.file_name);
    let path = dir.join(&title);

    let mut dst = tokio::fs::File::create(&path).await?;
    bot.download_file(&file.path, &mut dst)
        .await
        .map_err(|e| AppError::Download(format!("Telegram file download failed: {}", e)))?;

    Ok((path, byte_size, title))
}

/// Runs mediainfo over the partial file and publishes the formatted report.
async fn probe_and_publish(
    telegraph: &TelegraphClient,
    path: &Path,
    byte_size: u64,
    title: &str,
) -> Result<Option<String>, AppError> {
    let report = run_mediainfo(path).await?;

    let Some(fragment) = format_report(&report, byte_size, &FormatOptions::default()) else {
        return Ok(None);
    };

    let page_url = telegraph.publish(title, &fragment).await?;
    log::info!("Published MediaInfo report for {} at {}", title, page_url);

    Ok(Some(page_url))
}
