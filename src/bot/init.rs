use crate::bot::Handler;
use crate::config::Config;
use anyhow::{Context as AnyhowContext, Result};
use serenity::all::ApplicationId;
use serenity::prelude::*;

/// Initialize and start the Discord bot
pub async fn start_bot(config: Config) -> Result<()> {
    tracing::info!("[INIT] Starting wynnstats Discord bot");

    if !config.assets_dir.is_dir() {
        tracing::warn!(
            "[INIT] Asset directory {} does not exist, renders will fail",
            config.assets_dir.display()
        );
    }

    let token = config.discord_token.clone();
    let application_id = ApplicationId::new(config.application_id);
    let handler = Handler::new(config);

    let mut client = Client::builder(token, GatewayIntents::empty())
        .application_id(application_id)
        .event_handler(handler)
        .await
        .context("Error creating client")?;

    if let Err(why) = client.start().await {
        tracing::error!("[ERROR] Discord client error: {why:?}");
    }

    Ok(())
}
