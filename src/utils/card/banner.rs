use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use super::palette::Palette;
use crate::utils::assets::{AssetError, AssetStore};
use crate::utils::wynncraft::{BannerDescriptor, BannerLayer, GuildRecord, Wynncraft};

/// Coordinate space the pattern assets are drawn in.
pub const LOGICAL_SIZE: (u32, u32) = (160, 320);

const FALLBACK_COLOUR: &str = "SILVER";

#[derive(Debug, Error)]
pub enum BannerError {
    #[error("Unknown banner colour: '{0}'")]
    UnknownColour(String),
    #[error("Unknown banner pattern: '{0}'")]
    UnknownPattern(String),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Base colour plus pattern layers, still symbolic.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerSpec {
    pub base: String,
    pub layers: Vec<BannerLayer>,
}

impl BannerSpec {
    /// Banner shown for players without a guild.
    pub fn guildless() -> Self {
        BannerSpec {
            base: "SILVER".to_string(),
            layers: vec![
                BannerLayer::new("GRAY", "BORDER"),
                BannerLayer::new("GRAY", "MOJANG"),
            ],
        }
    }

    pub fn from_descriptor(descriptor: &BannerDescriptor) -> Self {
        BannerSpec {
            base: descriptor.base.clone(),
            layers: descriptor.layers.clone(),
        }
    }
}

/// Outcome of looking up the player's guild.
#[derive(Debug, Clone, PartialEq)]
pub enum GuildLookup {
    Guildless,
    Found(Box<GuildRecord>),
    /// The player has a guild but it could not be fetched or decoded.
    Unavailable,
}

impl GuildLookup {
    pub fn record(&self) -> Option<&GuildRecord> {
        match self {
            Self::Found(guild) => Some(guild),
            _ => None,
        }
    }
}

/// Fetches the guild, folding any failure into [`GuildLookup::Unavailable`].
pub async fn lookup_guild(client: &Wynncraft, name: Option<&str>) -> GuildLookup {
    let Some(name) = name else {
        return GuildLookup::Guildless;
    };

    match client.guild(name).await {
        Ok(guild) => GuildLookup::Found(Box::new(guild)),
        Err(e) => {
            tracing::warn!("[BANNER] Could not load guild '{}': {}", name, e);
            GuildLookup::Unavailable
        }
    }
}

/// Replaces the RGB of every pixel with `colour`, keeping each pixel's own alpha.
pub fn recolor(img: &RgbaImage, colour: Rgba<u8>) -> RgbaImage {
    let [r, g, b, _] = colour.0;
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        Rgba([r, g, b, img.get_pixel(x, y).0[3]])
    })
}

/// Pattern identifiers become file names, so only `[A-Z0-9_]` is accepted.
pub fn validate_pattern(pattern: &str) -> Result<&str, BannerError> {
    let valid = !pattern.is_empty()
        && pattern
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(pattern)
    } else {
        Err(BannerError::UnknownPattern(pattern.to_string()))
    }
}

/// Composites `spec` onto a `size` canvas. Colours resolve through the darkened palette.
pub fn compose_banner(
    spec: &BannerSpec,
    size: (u32, u32),
    palette: &Palette,
    assets: &AssetStore,
) -> Result<RgbaImage, BannerError> {
    let resolve = |name: &str| {
        palette
            .darkened(name)
            .ok_or_else(|| BannerError::UnknownColour(name.to_string()))
    };

    // Resolve everything up front so a bad layer never leaves a half-drawn banner.
    let base = resolve(&spec.base)?;
    let layers = spec
        .layers
        .iter()
        .map(|layer| Ok((resolve(&layer.colour)?, validate_pattern(&layer.pattern)?)))
        .collect::<Result<Vec<_>, BannerError>>()?;

    let mut banner = RgbaImage::from_pixel(size.0, size.1, base);
    for (colour, pattern) in layers {
        let source = assets.banner_pattern(pattern)?;
        let target = logical_to_canvas(source.dimensions(), size);
        let scaled = if source.dimensions() == target {
            source
        } else {
            imageops::resize(&source, target.0, target.1, FilterType::Nearest)
        };
        imageops::overlay(&mut banner, &recolor(&scaled, colour), 0, 0);
    }

    tracing::debug!(
        "[BANNER] Composed {} base with {} layers",
        spec.base,
        spec.layers.len()
    );
    Ok(banner)
}

/// Size of a pattern asset once the logical 160x320 space is stretched over `canvas`.
pub fn logical_to_canvas(asset: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    let scale = |len: u32, canvas: u32, logical: u32| {
        ((len as u64 * canvas as u64) / logical as u64).max(1) as u32
    };
    (
        scale(asset.0, canvas.0, LOGICAL_SIZE.0),
        scale(asset.1, canvas.1, LOGICAL_SIZE.1),
    )
}

/// Flat panel used when the guild's banner cannot be shown.
pub fn fallback_banner(size: (u32, u32), palette: &Palette) -> RgbaImage {
    let colour = palette
        .darkened(FALLBACK_COLOUR)
        .unwrap_or(Rgba([57, 57, 55, 255]));
    RgbaImage::from_pixel(size.0, size.1, colour)
}

/// Banner for the card. Guild problems degrade to [`fallback_banner`]; missing assets do not.
pub fn render_banner(
    lookup: &GuildLookup,
    size: (u32, u32),
    palette: &Palette,
    assets: &AssetStore,
) -> Result<RgbaImage, AssetError> {
    let spec = match lookup {
        GuildLookup::Guildless => BannerSpec::guildless(),
        GuildLookup::Unavailable => return Ok(fallback_banner(size, palette)),
        GuildLookup::Found(guild) => match &guild.banner {
            Some(descriptor) => BannerSpec::from_descriptor(descriptor),
            None => {
                tracing::warn!("[BANNER] Guild '{}' has no banner", guild.name);
                return Ok(fallback_banner(size, palette));
            }
        },
    };

    match compose_banner(&spec, size, palette, assets) {
        Ok(banner) => Ok(banner),
        Err(BannerError::Asset(e)) => Err(e),
        Err(e) => {
            tracing::warn!("[BANNER] Falling back to a flat banner: {}", e);
            Ok(fallback_banner(size, palette))
        }
    }
}
