//! Bot initialization and command definitions
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command registration in the Telegram UI

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use peekcore::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "show the intro message")]
    Start,
    #[command(description = "inspect the replied-to media or a link")]
    Mediainfo,
    #[command(description = "save the replied-to photo as your thumbnail")]
    Thumb,
    #[command(description = "delete your saved thumbnail")]
    Delthumb,
    #[command(description = "re-send the replied-to video/document with your thumbnail")]
    Mt,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to create bot (invalid URL, network issues, etc.)
pub fn create_bot() -> anyhow::Result<Bot> {
    // Check if local Bot API server is configured
    let bot = if let Ok(bot_api_url) = std::env::var("BOT_API_URL") {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        Bot::from_env_with_client(ClientBuilder::new().timeout(config::network::timeout()).build()?).set_api_url(url)
    } else {
        Bot::from_env_with_client(ClientBuilder::new().timeout(config::network::timeout()).build()?)
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
///
/// # Arguments
/// * `bot` - Bot instance to configure
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "show the intro message"),
        BotCommand::new("mediainfo", "inspect the replied-to media or a link"),
        BotCommand::new("thumb", "save the replied-to photo as your thumbnail"),
        BotCommand::new("delthumb", "delete your saved thumbnail"),
        BotCommand::new("mt", "re-send the replied-to video/document with your thumbnail"),
    ])
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let commands = Command::descriptions();
        let command_list = format!("{}", commands);

        // Check that the description header is present
        assert!(command_list.contains("I can"));

        // Check that the key commands are present
        assert!(command_list.contains("start"));
        assert!(command_list.contains("mediainfo"));
        assert!(command_list.contains("thumb"));
    }
}
