mod models;
pub(crate) mod roster;

pub use models::*;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug)]
/// Client for the public Wynncraft `/v3` API.
///
/// Holds the HTTP client and the base URL every endpoint is joined onto.
pub struct Wynncraft {
    http_client: Client,
    base_url: Url,
}

#[derive(Debug, Error)]
pub enum WynncraftError {
    #[error("Failed to reach the Wynncraft API: {0}")]
    /// Connection failures, timeouts and non-success statuses other than 404.
    FetchFailed(#[from] reqwest::Error),
    #[error("Nothing found for '{0}'")]
    NotFound(String),
    #[error("Unexpected response from the Wynncraft API: {0}")]
    /// The body arrived but does not match the expected record shape.
    DecodeFailed(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Wynncraft {
    pub fn new(base_url: Url) -> Self {
        Wynncraft {
            http_client: Client::new(),
            base_url,
        }
    }

    /// Fetches the full player record for a username or UUID.
    pub async fn player(&self, id: &str) -> Result<PlayerRecord, WynncraftError> {
        let mut url = self.endpoint("player", id)?;
        url.set_query(Some("fullResult"));
        self.get_json(url, id).await
    }

    /// Fetches a guild by its full name.
    pub async fn guild(&self, name: &str) -> Result<GuildRecord, WynncraftError> {
        let url = self.endpoint("guild", name)?;
        self.get_json(url, name).await
    }

    fn endpoint(&self, resource: &str, id: &str) -> Result<Url, WynncraftError> {
        let mut url = self.base_url.join(resource)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(id.trim());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, id: &str) -> Result<T, WynncraftError> {
        tracing::debug!("[WYNN] GET {}", url);

        let res = self.http_client.get(url).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(WynncraftError::NotFound(id.to_string()));
        }
        let body = res.error_for_status()?.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("[WYNN] Failed to decode response for '{}': {}", id, e);
            WynncraftError::DecodeFailed(e)
        })
    }
}
