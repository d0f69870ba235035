pub(crate) mod banner;
pub(crate) mod drawing;
pub(crate) mod layout;
pub(crate) mod palette;
pub(crate) mod pie;
pub(crate) mod text;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use thiserror::Error;

use crate::bot::Handler;
use crate::utils::assets::{AssetError, AssetStore, CardFonts};
use crate::utils::avatar::{AvatarError, fit_to_panel};
use crate::utils::wynncraft::PlayerRecord;
use banner::{GuildLookup, lookup_guild, render_banner};
use drawing::{draw_text_anchored, fill_rect, fill_rounded_rect, overlay_centered};
use layout::{CardLayout, SectionFrame, Widget};
use palette::{Palette, parse_hex};
use pie::{
    class_levels, draw_donut, gauge_slices, perfection_ring, pie_slices, random_start_angle,
};
use text::{CardText, GuildLines, RAIDS, StatSection, ValueColumn};

const BACKDROP: Rgba<u8> = Rgba([19, 0, 25, 255]);
const PANEL_SHADE: Rgba<u8> = Rgba([0, 0, 0, 120]);
const SECTION_SHADE: Rgba<u8> = Rgba([0, 0, 0, 91]);
const SECTION_RADIUS: f32 = 15.0;
const DEFAULT_NAME_COLOUR: Rgba<u8> = Rgba([221, 225, 218, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

const DONUT_OUTER: f32 = 45.0;
const DONUT_INNER: f32 = 35.0;
const PERFECTION_INNER: f32 = 30.0;

const BADGE_PREFIX: &str = "nextgen/badges/";
const BADGE_SUFFIX: &str = ".svg";
pub const NO_RANK_BADGE: &str = "rank_none";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render failed, asset unavailable: {0}")]
    AssetLoadFailed(#[from] AssetError),
    #[error("Render failed, avatar unavailable: {0}")]
    Avatar(#[from] AvatarError),
    #[error("Render failed, could not encode PNG: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Render failed, could not save PNG to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything one card render needs that does not come from disk.
pub struct CardInputs<'a> {
    pub player: &'a PlayerRecord,
    pub guild: &'a GuildLookup,
    pub avatar: &'a RgbaImage,
    pub now: DateTime<Utc>,
    /// Angle the raid donut's first slice starts at.
    pub pie_start: f32,
}

/// Asset key for a `rankBadge` path such as `nextgen/badges/rank_champion.svg`.
pub fn badge_key(rank_badge: &str) -> Option<&str> {
    let key = rank_badge
        .trim()
        .trim_start_matches('/')
        .strip_prefix(BADGE_PREFIX)?
        .strip_suffix(BADGE_SUFFIX)?;
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(key)
}

fn rank_badge_key(player: &PlayerRecord) -> &str {
    match player.rank_badge.as_deref() {
        None => NO_RANK_BADGE,
        Some(raw) => badge_key(raw).unwrap_or_else(|| {
            tracing::warn!("[CARD] Unrecognised rank badge path '{}'", raw);
            NO_RANK_BADGE
        }),
    }
}

/// Scales `img` to fit inside `bounds` without changing its aspect ratio.
fn scale_within(img: &RgbaImage, bounds: (u32, u32)) -> RgbaImage {
    let (w, h) = (img.width().max(1) as f32, img.height().max(1) as f32);
    let scale = (bounds.0 as f32 / w).min(bounds.1 as f32 / h);
    let target = (
        ((w * scale).round() as u32).max(1),
        ((h * scale).round() as u32).max(1),
    );
    if target == img.dimensions() {
        img.clone()
    } else {
        imageops::resize(img, target.0, target.1, FilterType::Nearest)
    }
}

fn draw_header(
    card: &mut RgbaImage,
    layout: &CardLayout,
    text: &CardText,
    player: &PlayerRecord,
    fonts: &CardFonts,
    assets: &AssetStore,
) -> Result<(), AssetError> {
    let slot = layout.rect(Widget::RankBadge);
    let badge = scale_within(&assets.rank_badge(rank_badge_key(player))?, (slot.width, slot.height));
    let badge_y = slot.y + (slot.height as i32 - badge.height() as i32) / 2;
    imageops::overlay(card, &badge, slot.x as i64, badge_y as i64);

    let name_colour = player
        .legacy_rank_colour
        .as_ref()
        .and_then(|colour| parse_hex(&colour.sub))
        .unwrap_or(DEFAULT_NAME_COLOUR);
    let name_x = (slot.x + badge.width() as i32 + 15) as f32;
    let name_y = slot.center().1;
    draw_text_anchored(card, name_colour, name_x, name_y, 0.0, 0.4, 42.0, &fonts.title, &text.username);

    let subtitles = [text.first_joined.as_deref(), text.presence.as_deref()];
    for (line, y) in subtitles.into_iter().zip([58.0, 80.0]) {
        if let Some(line) = line {
            draw_text_anchored(card, WHITE, 20.0, y, 0.0, 0.0, 16.0, &fonts.body, line);
        }
    }
    Ok(())
}

fn draw_guild_block(card: &mut RgbaImage, layout: &CardLayout, lines: &GuildLines, fonts: &CardFonts) {
    let block = layout.rect(Widget::GuildBlock);
    let (x, top) = (block.x as f32, block.y as f32);

    draw_text_anchored(card, WHITE, x, top + 30.0, 0.0, 0.5, 20.0, &fonts.body, &lines.title);

    let details = [
        (lines.since.as_deref(), 60.0),
        (lines.name_level.as_deref(), 80.0),
        (lines.contribution.as_deref(), 120.0),
    ];
    for (line, offset) in details {
        if let Some(line) = line {
            draw_text_anchored(card, WHITE, x, top + offset, 0.0, 0.5, 15.0, &fonts.body, line);
        }
    }
}

/// Draws the three stat sections and returns their frames.
fn draw_sections(
    card: &mut RgbaImage,
    layout: &CardLayout,
    text: &CardText,
    fonts: &CardFonts,
) -> Vec<SectionFrame> {
    let column = layout.rect(Widget::StatsColumn);
    let x = column.x as f32;
    let frames = layout.sections(&text.sections.each_ref().map(StatSection::slots));

    for (section, frame) in text.sections.iter().zip(&frames) {
        fill_rounded_rect(card, frame.panel, SECTION_RADIUS, SECTION_SHADE);
        draw_text_anchored(card, WHITE, x, frame.title_y as f32, 0.0, 0.5, 24.0, &fonts.body, section.title);

        for (slot, row) in section.rows.iter().enumerate() {
            let Some(row) = row else { continue };
            let y = frame.row_y(slot + 1, layout.row_step) as f32;
            let value_x = match row.column {
                ValueColumn::Wide => x + 160.0,
                ValueColumn::Narrow => x + 90.0,
            };
            draw_text_anchored(card, WHITE, x, y, 0.0, 0.5, 16.0, &fonts.body, row.label);
            draw_text_anchored(
                card,
                row.colour.unwrap_or(WHITE),
                value_x,
                y,
                0.0,
                0.5,
                16.0,
                &fonts.body,
                &row.value,
            );
        }
    }
    frames
}

fn draw_footer(
    card: &mut RgbaImage,
    layout: &CardLayout,
    player: &PlayerRecord,
    fonts: &CardFonts,
    assets: &AssetStore,
) -> Result<(), AssetError> {
    let footer = layout.rect(Widget::Footer);
    imageops::overlay(card, &assets.footer()?, footer.x as i64, footer.y as i64);

    let (caption_x, caption_y) = layout.footer_caption();
    draw_text_anchored(card, WHITE, caption_x, caption_y, 0.5, 0.0, 24.0, &fonts.body, "completion");

    let levels = class_levels(&player.characters);
    for (index, (class, level)) in levels.iter().enumerate() {
        let (cx, cy) = layout.gauge_center(index, levels.len());
        draw_donut(card, (cx, cy), DONUT_OUTER, DONUT_INNER, &gauge_slices(*class, *level));
        if let Some(ring) = perfection_ring(*class, *level) {
            draw_donut(card, (cx, cy), DONUT_INNER, PERFECTION_INNER, &[ring]);
        }

        let icon = assets.class_icon(class.as_str())?;
        overlay_centered(card, &icon, cx, cy - 11.0);
        draw_text_anchored(
            card,
            class.colour(),
            cx,
            cy + 11.0,
            0.5,
            0.5,
            22.0,
            &fonts.title,
            &level.to_string(),
        );
    }
    Ok(())
}

/// Composes the stats card, back to front. Any missing asset aborts the render.
pub fn render_card(
    inputs: &CardInputs,
    layout: &CardLayout,
    palette: &Palette,
    assets: &AssetStore,
) -> Result<RgbaImage, RenderError> {
    let player = inputs.player;
    let fonts = assets.card_fonts()?;
    let text = CardText::build(player, inputs.guild.record(), inputs.now);

    let canvas = layout.rect(Widget::Canvas);
    let mut card = RgbaImage::from_pixel(canvas.width, canvas.height, BACKDROP);
    imageops::overlay(&mut card, &assets.background()?, 0, 0);

    fill_rect(&mut card, layout.rect(Widget::Header), PANEL_SHADE);
    fill_rect(&mut card, layout.rect(Widget::SidePanel), PANEL_SHADE);

    let avatar_panel = layout.rect(Widget::AvatarPanel);
    let avatar = fit_to_panel(inputs.avatar, (avatar_panel.width, avatar_panel.height));
    let (avatar_x, avatar_y) = avatar_panel.center();
    overlay_centered(&mut card, &avatar, avatar_x, avatar_y);

    let banner_rect = layout.rect(Widget::Banner);
    let banner = render_banner(
        inputs.guild,
        (banner_rect.width, banner_rect.height),
        palette,
        assets,
    )?;
    imageops::overlay(&mut card, &banner, banner_rect.x as i64, banner_rect.y as i64);

    draw_header(&mut card, layout, &text, player, &fonts, assets)?;

    if let Some(lines) = &text.guild {
        draw_guild_block(&mut card, layout, lines, &fonts);
    }

    let frames = draw_sections(&mut card, layout, &text, &fonts);
    if let Some(raid_frame) = frames.get(1) {
        let counts = RAIDS.map(|raid| (player.global_data.raids.count(raid.name), raid.colour));
        let slices = pie_slices(&counts, inputs.pie_start);
        draw_donut(
            &mut card,
            layout.raid_pie_center(raid_frame),
            DONUT_OUTER,
            DONUT_INNER,
            &slices,
        );
    }

    draw_footer(&mut card, layout, player, &fonts, assets)?;

    Ok(card)
}

pub fn encode_png(img: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut out_buf: Vec<u8> = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out_buf), image::ImageFormat::Png)
        .map_err(|e| {
            tracing::error!("[CARD] Failed to encode PNG: {}", e);
            RenderError::Encode(e)
        })?;
    Ok(out_buf)
}

pub fn save_png(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    std::fs::write(path, bytes).map_err(|source| {
        tracing::error!("[CARD] Failed to save PNG to {}: {}", path.display(), source);
        RenderError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Fetches the guild and avatar for `player`, renders the card and returns PNG bytes.
pub async fn draw_stats_card(player: &PlayerRecord, handler: &Handler) -> Result<Vec<u8>, RenderError> {
    tracing::info!("[CARD] Starting stats card for {}", player.username);

    let guild_name = player.guild.as_ref().map(|g| g.name.as_str());
    let guild = lookup_guild(&handler.wynncraft, guild_name).await;
    let avatar = handler.avatars.fullbody(&player.username).await?;

    let inputs = CardInputs {
        player,
        guild: &guild,
        avatar: &avatar,
        now: Utc::now(),
        pie_start: random_start_angle(),
    };
    let card = render_card(&inputs, &CardLayout::STANDARD, &handler.palette, &handler.assets)?;
    let out_buf = encode_png(card)?;

    if let Some(dir) = &handler.config.output_dir {
        let file_name: String = player
            .username
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        save_png(&dir.join(format!("{}.png", file_name)), &out_buf)?;
    }

    tracing::info!(
        "[CARD] Successfully generated stats card ({} bytes)",
        out_buf.len()
    );
    Ok(out_buf)
}
