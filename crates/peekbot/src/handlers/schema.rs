//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::bot::Command;

use super::commands::{handle_mediainfo_command, handle_private_message, handle_start_command};
use super::thumbs::{handle_delthumb_command, handle_mt_command, handle_thumb_command};
use super::types::{HandlerDeps, HandlerError};

/// Creates the main dispatcher schema for the Telegram bot.
///
/// This function returns a handler tree that can be used with teloxide's
/// Dispatcher. The same schema is used in production and in tests.
///
/// # Arguments
/// * `deps` - Handler dependencies (HTTP client, Telegraph client, thumbnail store)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_private = deps.clone();

    dptree::entry()
        // Command handler first so commands in private chats are not
        // swallowed by the free-form message handler
        .branch(command_handler(deps_commands))
        // Private chats accept bare links and media without a command
        .branch(private_message_handler(deps_private))
}

/// Handler for bot commands (/start, /mediainfo, /thumb, /delthumb, /mt)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                let result = match cmd {
                    Command::Start => handle_start_command(&bot, &msg).await,
                    Command::Mediainfo => handle_mediainfo_command(&bot, &msg, &deps).await,
                    Command::Thumb => handle_thumb_command(&bot, &msg, &deps).await,
                    Command::Delthumb => handle_delthumb_command(&bot, &msg, &deps).await,
                    Command::Mt => handle_mt_command(&bot, &msg, &deps).await,
                };

                if let Err(e) = result {
                    log::error!("❌ {:?} handler failed for chat {}: {}", cmd, msg.chat.id, e);
                    let _ = bot
                        .send_message(msg.chat.id, format!("❌ Command failed: {}", e))
                        .await;
                }
                Ok(())
            }
        },
    ))
}

/// Handler for regular messages in private chats (links, media)
fn private_message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Err(e) = handle_private_message(&bot, &msg, &deps).await {
                    log::error!("Error handling message from chat {}: {:?}", msg.chat.id, e);
                }
                Ok(())
            }
        })
}
