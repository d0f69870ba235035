use image::RgbaImage;
use image::imageops::{self, FilterType};
use reqwest::{Client, Url};
use thiserror::Error;

/// Fraction of the avatar panel the render may occupy.
pub const FIT_MARGIN: f32 = 0.9;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Failed to fetch avatar: {0}")]
    FetchFailed(#[from] reqwest::Error),
    #[error("Failed to decode avatar: {0}")]
    DecodeFailed(#[from] image::ImageError),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Client for the full-body skin render service.
#[derive(Debug)]
pub struct AvatarClient {
    http_client: Client,
    base_url: Url,
}

impl AvatarClient {
    pub fn new(base_url: Url) -> Self {
        AvatarClient {
            http_client: Client::new(),
            base_url,
        }
    }

    pub async fn fullbody(&self, username: &str) -> Result<RgbaImage, AvatarError> {
        let mut url = self.base_url.join("fullbody")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(username);

        tracing::debug!("[AVATAR] Downloading avatar from: {}", url);

        let bytes = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let img = image::load_from_memory(&bytes)?.to_rgba8();

        tracing::debug!(
            "[AVATAR] Downloaded avatar for {} ({}x{})",
            username,
            img.width(),
            img.height()
        );
        Ok(img)
    }
}

/// Size of `src` after scaling it to fit inside `panel`, aspect ratio preserved, shrunk by [`FIT_MARGIN`].
pub fn fit_size(src: (u32, u32), panel: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (src.0.max(1) as f32, src.1.max(1) as f32);
    let scale = (panel.0 as f32 / src_w).min(panel.1 as f32 / src_h) * FIT_MARGIN;
    (
        ((src_w * scale).round() as u32).max(1),
        ((src_h * scale).round() as u32).max(1),
    )
}

pub fn fit_to_panel(avatar: &RgbaImage, panel: (u32, u32)) -> RgbaImage {
    let (w, h) = fit_size(avatar.dimensions(), panel);
    imageops::resize(avatar, w, h, FilterType::Triangle)
}
