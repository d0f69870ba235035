use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.wynncraft.com/v3/";
const DEFAULT_AVATAR_URL: &str = "https://nmsr.nickac.dev/";
const DEFAULT_ASSETS_DIR: &str = "assets";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment value: '{0}'")]
    Missing(&'static str),
    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Startup configuration. Loaded once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub application_id: u64,
    pub guild_id: u64,
    pub api_base: Url,
    pub avatar_base: Url,
    pub assets_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Reads `secrets.env` (then `.env`) into the process environment and builds the config.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::from_filename("secrets.env").is_err() {
            let _ = dotenvy::dotenv();
        }
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let discord_token = required("DISCORD_TOKEN")?;
        let application_id = parse_id("APP_ID", &required("APP_ID")?)?;
        let guild_id = parse_id("GUILD_ID", &required("GUILD_ID")?)?;

        let api_base = parse_base_url(
            "WYNNCRAFT_API_URL",
            lookup("WYNNCRAFT_API_URL").as_deref().unwrap_or(DEFAULT_API_URL),
        )?;
        let avatar_base = parse_base_url(
            "AVATAR_API_URL",
            lookup("AVATAR_API_URL").as_deref().unwrap_or(DEFAULT_AVATAR_URL),
        )?;

        let assets_dir = lookup("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
        let output_dir = lookup("CARD_OUTPUT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            discord_token,
            application_id,
            guild_id,
            api_base,
            avatar_base,
            assets_dir,
            output_dir,
        })
    }
}

fn parse_id(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            reason: format!("'{}' is not a Discord snowflake", raw),
        })
}

/// Parses a base URL and makes sure it ends with `/` so that `Url::join` keeps the last segment.
pub fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
