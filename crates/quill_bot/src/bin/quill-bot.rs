//! Quill bot - reactive message demonstrations on Discord.

use clap::Parser;
use quill_bot::{BotConfig, QuillHandler, init_tracing};
use serenity::Client;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for the bot.
#[derive(Parser, Debug)]
#[command(name = "quill-bot")]
#[command(about = "Quill bot - reactive, permission-aware Discord menus")]
#[command(version)]
struct Args {
    /// Configuration file; the layered defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BotConfig::from_file(path)?,
        None => BotConfig::load()?,
    };
    init_tracing(config.logging())?;

    info!(
        config_file = ?args.config,
        prefix = %config.bot().prefix(),
        permission_timeout = config.reactive().permission_timeout(),
        hoist_interval = config.reactive().hoist_interval(),
        "Starting quill bot"
    );

    let mut client = Client::builder(&args.token, QuillHandler::intents())
        .event_handler(QuillHandler::new(&config))
        .await?;

    client.start().await?;
    Ok(())
}
