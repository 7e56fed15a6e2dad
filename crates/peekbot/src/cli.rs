use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediapeek")]
#[command(author, version, about = "Telegram bot that runs MediaInfo over chat media and URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot
    Run,

    /// Inspect a local file and print the formatted report fragment
    Probe {
        /// File to inspect
        path: PathBuf,

        /// Publish the fragment to Telegraph and print the page URL
        #[arg(long)]
        publish: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
