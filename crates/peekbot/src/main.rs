use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;

mod bot;
mod cli;
mod handlers;

use cli::{Cli, Commands};
use peekcore::core::web_server::start_web_server;
use peekcore::core::{config, init_logger, log_startup_configuration};
use peekcore::probe;
use peekcore::publish::TelegraphClient;
use peekcore::report::{format_report, FormatOptions};
use peekcore::thumbs::ThumbStore;

use crate::bot::{create_bot, setup_bot_commands};
use crate::handlers::HandlerDeps;

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, mediainfo check, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up global panic handler to catch panics in dispatcher
    // This allows us to log the panic and continue working instead of terminating
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::Probe { path, publish }) => run_probe(path, publish).await,
        None => {
            // No command specified - default to running the bot
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Run the bot in long-polling mode
async fn run_bot() -> Result<()> {
    log_startup_configuration();

    // A broken mediainfo install should fail here, not on the first request
    match probe::mediainfo_version().await {
        Ok(version) => log::info!("mediainfo version: {}", version),
        Err(e) => return Err(anyhow::anyhow!("mediainfo is not usable: {}", e)),
    }

    // Keep-alive endpoint for the hosting platform
    tokio::spawn(async {
        if let Err(e) = start_web_server(config::web::port()).await {
            log::error!("Keep-alive server failed: {}", e);
        }
    });

    let bot = create_bot()?;
    let me = bot.get_me().await?;
    log::info!("Starting MediaPeek as @{}", me.username());

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let http = reqwest::Client::builder().timeout(config::network::timeout()).build()?;
    let deps = HandlerDeps::new(
        http,
        Arc::new(TelegraphClient::new()?),
        Arc::new(ThumbStore::open_default()),
        Some(me.username().to_string()),
        me.id,
    );

    Dispatcher::builder(bot, handlers::schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Run the probe subcommand against a local file
async fn run_probe(path: PathBuf, publish: bool) -> Result<()> {
    let byte_size = std::fs::metadata(&path)?.len();
    let report = probe::run_mediainfo(&path).await?;

    let Some(fragment) = format_report(&report, byte_size, &FormatOptions::default()) else {
        println!("No video or audio streams found.");
        return Ok(());
    };

    if publish {
        let title = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("report")
            .to_string();

        let client = TelegraphClient::new()?;
        let url = client.publish(&title, &fragment).await?;
        println!("{}", url);
    } else {
        println!("{}", fragment);
    }

    Ok(())
}
