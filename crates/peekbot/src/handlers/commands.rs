//! Command handler implementations (/start, /mediainfo) and private-chat routing

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode, ReplyParameters};

use peekcore::core::error::AppResult;

use super::mediainfo::{find_link, find_media, handle_mediainfo_request, ProbeTarget};
use super::types::HandlerDeps;

const START_TEXT: &str = "👋 <b>Hi!</b>\n\n\
I am a MediaInfo bot.\n\n\
📥 <b>How to use</b>\n\
Send me a file, a video or a direct link and I will reply with a link to the full report.\n\
In groups, reply to a file or a link with /mediainfo.\n\n\
🖼 Reply to a photo with /thumb to save it as your thumbnail, then reply to a \
video or document with /mt to get it back with that thumbnail attached.";

const USAGE_TEXT: &str = "<b>How to use:</b>\n\
• Send a link or media together with the /mediainfo command, in a reply or in the text.";

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> AppResult<()> {
    bot.send_message(msg.chat.id, START_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle /mediainfo command
///
/// Accepts a link as the command argument, a link in the replied-to message,
/// or a media attachment in the replied-to message, in that order.
pub(super) async fn handle_mediainfo_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let text = msg.text().unwrap_or_default();
    let reply = msg.reply_to_message();

    let link = find_link(text).or_else(|| reply.and_then(|r| r.text()).and_then(find_link));
    if let Some(url) = link {
        return handle_mediainfo_request(bot, msg, deps, ProbeTarget::Link(url)).await;
    }

    if let Some(media) = reply.and_then(find_media) {
        return handle_mediainfo_request(bot, msg, deps, ProbeTarget::Media(media)).await;
    }

    bot.send_message(msg.chat.id, USAGE_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle a non-command message in a private chat
///
/// A link or a media attachment starts the pipeline directly, no command
/// needed; anything else gets a short usage hint.
pub(super) async fn handle_private_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    if let Some(url) = msg.text().and_then(find_link) {
        return handle_mediainfo_request(bot, msg, deps, ProbeTarget::Link(url)).await;
    }

    if let Some(media) = find_media(msg) {
        return handle_mediainfo_request(bot, msg, deps, ProbeTarget::Media(media)).await;
    }

    if msg.photo().is_some() {
        bot.send_message(
            msg.chat.id,
            "Reply to this photo with /thumb to save it as your thumbnail.",
        )
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "Send me a link or a media file to get a MediaInfo report.")
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
