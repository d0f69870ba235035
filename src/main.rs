mod bot;
mod commands;
mod config;
mod utils;

#[cfg(test)]
mod tests;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = config::Config::from_env()?;
    tracing::info!(
        "[INIT] Using Wynncraft API at {} and assets from {}",
        config.api_base,
        config.assets_dir.display()
    );

    bot::init::start_bot(config).await
}
