use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to load asset {path}: {source}")]
    AssetLoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Asset {path} is not a valid image: {source}")]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Asset {path} is not a valid font")]
    InvalidFont { path: PathBuf },
}

/// Read-only view over the asset directory (fonts, backgrounds, banner patterns, badges, class icons).
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

/// The two typefaces used on the stats card.
#[derive(Clone)]
pub struct CardFonts {
    pub title: FontArc,
    pub body: FontArc,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetStore { root: root.into() }
    }

    pub fn image(&self, relative: impl AsRef<Path>) -> Result<RgbaImage, AssetError> {
        let path = self.root.join(relative);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::AssetLoadFailed {
            path: path.clone(),
            source,
        })?;

        let img = image::load_from_memory(&bytes)
            .map_err(|source| AssetError::InvalidImage {
                path: path.clone(),
                source,
            })?
            .to_rgba8();

        tracing::trace!(
            "[ASSET] Loaded {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(img)
    }

    pub fn font(&self, file_name: &str) -> Result<FontArc, AssetError> {
        let path = self.root.join("fonts").join(file_name);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::AssetLoadFailed {
            path: path.clone(),
            source,
        })?;

        FontArc::try_from_vec(bytes).map_err(|_| AssetError::InvalidFont { path })
    }

    pub fn card_fonts(&self) -> Result<CardFonts, AssetError> {
        Ok(CardFonts {
            title: self.font("minecraft.ttf")?,
            body: self.font("comfortaa_bold.ttf")?,
        })
    }

    pub fn background(&self) -> Result<RgbaImage, AssetError> {
        self.image("images/background.png")
    }

    pub fn footer(&self) -> Result<RgbaImage, AssetError> {
        self.image("images/footer.png")
    }

    pub fn banner_pattern(&self, pattern: &str) -> Result<RgbaImage, AssetError> {
        self.image(format!("banner/{pattern}.png"))
    }

    pub fn rank_badge(&self, key: &str) -> Result<RgbaImage, AssetError> {
        self.image(format!("ranks/{key}.png"))
    }

    pub fn class_icon(&self, class_name: &str) -> Result<RgbaImage, AssetError> {
        self.image(format!("classes/{class_name}.png"))
    }
}
