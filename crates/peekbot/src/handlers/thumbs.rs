//! Thumbnail commands: /thumb, /delthumb, /mt

use std::io::Cursor;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileMeta, InputFile, Message, ReplyParameters};

use peekcore::core::config;
use peekcore::core::error::{AppError, AppResult};
use peekcore::core::utils::{escape_filename, format_size};

use super::types::HandlerDeps;

/// Extracts the sender's user id, 0 when the message has no sender.
fn sender_id(msg: &Message) -> i64 {
    msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0)
}

/// Handle /thumb command: store the replied-to photo as the caller's thumbnail
pub(super) async fn handle_thumb_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let user_id = sender_id(msg);

    let photo = msg
        .reply_to_message()
        .and_then(|reply| reply.photo())
        .and_then(|sizes| sizes.iter().max_by_key(|p| p.file.size));

    let Some(photo) = photo else {
        bot.send_message(msg.chat.id, "Reply to a photo with /thumb to save it as your thumbnail.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    };

    let file = bot.get_file(photo.file.id.clone()).await?;
    let mut buf = Cursor::new(Vec::new());
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| AppError::Download(format!("Telegram file download failed: {}", e)))?;

    match deps.thumbs.store(user_id, &buf.into_inner()).await {
        Ok(path) => {
            log::info!("Stored thumbnail for user {} at {}", user_id, path.display());
            bot.send_message(msg.chat.id, "✅ Thumbnail saved. Reply to a video or document with /mt to use it.")
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        Err(AppError::Validation(reason)) => {
            bot.send_message(msg.chat.id, format!("❌ {}", reason))
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Handle /delthumb command
pub(super) async fn handle_delthumb_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let user_id = sender_id(msg);

    let text = if deps.thumbs.delete(user_id).await? {
        "🗑 Thumbnail deleted."
    } else {
        "You have no saved thumbnail."
    };

    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle /mt command: re-send the replied-to video/document with the
/// caller's cached thumbnail attached
pub(super) async fn handle_mt_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let user_id = sender_id(msg);

    let Some(thumb_path) = deps.thumbs.get(user_id).await else {
        bot.send_message(msg.chat.id, "Save a thumbnail first: reply to a photo with /thumb.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    };

    let Some((file, file_name, is_video)) = msg.reply_to_message().and_then(reuploadable_media) else {
        bot.send_message(msg.chat.id, "Reply to a video or a document with /mt.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    };

    let byte_size = u64::from(file.size);
    if byte_size > config::limits::BOT_API_FILE_LIMIT_BYTES {
        bot.send_message(
            msg.chat.id,
            format!(
                "❌ File is {}, above the {} the Bot API can serve.",
                format_size(byte_size),
                format_size(config::limits::BOT_API_FILE_LIMIT_BYTES)
            ),
        )
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
        return Ok(());
    }

    let status = bot
        .send_message(msg.chat.id, "⏳ Re-uploading with your thumbnail...")
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    let result = reupload_with_thumbnail(bot, msg, &file, &file_name, is_video, &thumb_path).await;

    match result {
        Ok(()) => {
            let _ = bot.delete_message(msg.chat.id, status.id).await;
        }
        Err(e) => {
            log::error!("/mt failed for user {}: {}", user_id, e);
            bot.edit_message_text(msg.chat.id, status.id, format!("❌ Re-upload failed: {}", e))
                .await?;
        }
    }

    Ok(())
}

/// A video or document that can be re-sent with a new thumbnail.
///
/// Telegram ignores thumbnails on file_id re-sends, so only media the bot can
/// download and upload again qualifies.
fn reuploadable_media(msg: &Message) -> Option<(FileMeta, String, bool)> {
    if let Some(video) = msg.video() {
        let name = video.file_name.clone().unwrap_or_else(|| "video.mp4".to_string());
        return Some((video.file.clone(), name, true));
    }
    if let Some(doc) = msg.document() {
        let name = doc.file_name.clone().unwrap_or_else(|| "document.bin".to_string());
        return Some((doc.file.clone(), name, false));
    }
    None
}

async fn reupload_with_thumbnail(
    bot: &Bot,
    msg: &Message,
    file: &FileMeta,
    file_name: &str,
    is_video: bool,
    thumb_path: &std::path::Path,
) -> AppResult<()> {
    let dir = std::path::PathBuf::from(config::expand_path(&config::DOWNLOAD_FOLDER));
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(escape_filename(file_name));

    let remote = bot.get_file(file.id.clone()).await?;
    let mut dst = tokio::fs::File::create(&path).await?;
    bot.download_file(&remote.path, &mut dst)
        .await
        .map_err(|e| AppError::Download(format!("Telegram file download failed: {}", e)))?;

    let send_result = if is_video {
        bot.send_video(msg.chat.id, InputFile::file(&path))
            .thumbnail(InputFile::file(thumb_path))
            .reply_parameters(ReplyParameters::new(msg.id))
            .await
            .map(|_| ())
    } else {
        bot.send_document(msg.chat.id, InputFile::file(&path))
            .thumbnail(InputFile::file(thumb_path))
            .reply_parameters(ReplyParameters::new(msg.id))
            .await
            .map(|_| ())
    };

    if let Err(e) = tokio::fs::remove_file(&path).await {
        log::warn!("Failed to remove {}: {}", path.display(), e);
    }

    send_result?;
    Ok(())
}
