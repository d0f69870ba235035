#[cfg(test)]
pub mod tests {
    use std::path::PathBuf;

    use crate::bot::Handler;
    use crate::config::Config;
    use crate::tests::fixtures::{card_asset_dir, guild_json, player};
    use crate::utils::assets::{AssetError, AssetStore};
    use crate::utils::card::banner::{BannerSpec, GuildLookup, compose_banner, fallback_banner};
    use crate::utils::card::layout::{CardLayout, Widget};
    use crate::utils::card::palette::Palette;
    use crate::utils::card::{CardInputs, RenderError, draw_stats_card, encode_png, render_card};
    use crate::utils::wynncraft::PlayerRecord;
    use chrono::{TimeZone, Utc};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use image::{Rgba, RgbaImage};
    use url::Url;

    /// Points inside the banner that no later layer draws over, in card coordinates.
    const EXPOSED_BANNER_POINTS: [(u32, u32); 3] = [(285, 110), (285, 400), (556, 685)];

    fn avatar() -> RgbaImage {
        RgbaImage::from_pixel(10, 20, Rgba([90, 160, 60, 255]))
    }

    fn render(
        player: &PlayerRecord,
        guild: &GuildLookup,
        assets: &AssetStore,
    ) -> Result<RgbaImage, RenderError> {
        let avatar = avatar();
        let inputs = CardInputs {
            player,
            guild,
            avatar: &avatar,
            now: Utc.with_ymd_and_hms(2025, 1, 10, 17, 0, 0).unwrap(),
            pie_start: 0.0,
        };
        render_card(&inputs, &CardLayout::STANDARD, &Palette::default(), assets)
    }

    fn assert_banner_exposed(card: &RgbaImage, banner: &RgbaImage) {
        let origin = CardLayout::STANDARD.rect(Widget::Banner);
        for (x, y) in EXPOSED_BANNER_POINTS {
            let expected = banner.get_pixel(x - origin.x as u32, y - origin.y as u32);
            assert_eq!(card.get_pixel(x, y), expected, "at ({}, {})", x, y);
        }
    }

    fn guild_block_is_blank(card: &RgbaImage) -> bool {
        let block = CardLayout::STANDARD.rect(Widget::GuildBlock);
        let first = card.get_pixel(block.x as u32, block.y as u32);
        (block.y..block.bottom()).all(|y| {
            (block.x..block.right()).all(|x| card.get_pixel(x as u32, y as u32) == first)
        })
    }

    // Group 1: full composition
    mod compose_tests {
        use super::*;

        #[test]
        fn test_guildless_card_uses_default_banner() {
            let assets = AssetStore::new(card_asset_dir("guildless"));
            let mut player = player();
            player.guild = None;

            let card = render(&player, &GuildLookup::Guildless, &assets).unwrap();
            assert_eq!(card.dimensions(), (562, 952));

            let banner_rect = CardLayout::STANDARD.rect(Widget::Banner);
            let banner = compose_banner(
                &BannerSpec::guildless(),
                (banner_rect.width, banner_rect.height),
                &Palette::default(),
                &assets,
            )
            .unwrap();
            assert_banner_exposed(&card, &banner);
            assert!(guild_block_is_blank(&card));
        }

        #[test]
        fn test_unavailable_guild_uses_flat_banner() {
            let assets = AssetStore::new(card_asset_dir("unavailable"));
            let card = render(&player(), &GuildLookup::Unavailable, &assets).unwrap();
            assert_eq!(card.dimensions(), (562, 952));

            let banner_rect = CardLayout::STANDARD.rect(Widget::Banner);
            let banner = fallback_banner((banner_rect.width, banner_rect.height), &Palette::default());
            assert_banner_exposed(&card, &banner);
            // The membership line is still drawn without the guild record.
            assert!(!guild_block_is_blank(&card));
        }

        #[test]
        fn test_unrecognised_badge_uses_rank_none() {
            let dir = card_asset_dir("badge");
            std::fs::remove_file(dir.join("ranks/rank_champion.png")).unwrap();
            let mut player = player();
            player.rank_badge = Some("somewhere/else/rank_champion.png".to_string());

            let card = render(&player, &GuildLookup::Unavailable, &AssetStore::new(dir));
            assert!(card.is_ok());
        }
    }

    // Group 2: asset failures
    mod asset_failure_tests {
        use super::*;

        #[test]
        fn test_empty_asset_dir_fails() {
            let dir = std::env::temp_dir().join(format!("wynnstats-empty-{}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();

            let result = render(&player(), &GuildLookup::Guildless, &AssetStore::new(dir));
            assert!(matches!(
                result,
                Err(RenderError::AssetLoadFailed(AssetError::AssetLoadFailed { .. }))
            ));
        }

        #[test]
        fn test_missing_class_icon_fails() {
            let dir = card_asset_dir("class-icon");
            std::fs::remove_file(dir.join("classes/SHAMAN.png")).unwrap();

            let result = render(&player(), &GuildLookup::Unavailable, &AssetStore::new(dir));
            match result {
                Err(RenderError::AssetLoadFailed(AssetError::AssetLoadFailed { path, .. })) => {
                    assert!(path.ends_with("classes/SHAMAN.png"), "{}", path.display());
                }
                other => panic!("expected a missing class icon, got {:?}", other.map(|_| ())),
            }
        }

        #[test]
        fn test_missing_banner_pattern_fails() {
            let dir = card_asset_dir("pattern");
            std::fs::remove_file(dir.join("banner/MOJANG.png")).unwrap();

            let result = render(&player(), &GuildLookup::Guildless, &AssetStore::new(dir));
            assert!(matches!(result, Err(RenderError::AssetLoadFailed(_))));
        }
    }

    // Group 3: end to end through the handler
    mod pipeline_tests {
        use super::*;

        fn handler(server: &MockServer, assets_dir: PathBuf, output_dir: Option<PathBuf>) -> Handler {
            let base = Url::parse(&server.url("/")).unwrap();
            Handler::new(Config {
                discord_token: "token".to_string(),
                application_id: 1,
                guild_id: 1,
                api_base: base.clone(),
                avatar_base: base,
                assets_dir,
                output_dir,
            })
        }

        #[tokio::test]
        async fn test_missing_avatar_is_render_error() {
            let server = MockServer::start_async().await;
            let _mock = server
                .mock_async(|when, then| {
                    when.method(GET).path("/fullbody/Salted");
                    then.status(404);
                })
                .await;

            let handler = handler(&server, card_asset_dir("avatar-404"), None);
            let mut player = player();
            player.guild = None;

            let result = draw_stats_card(&player, &handler).await;
            assert!(matches!(result, Err(RenderError::Avatar(_))));
        }

        #[tokio::test]
        async fn test_card_rendered_and_saved() {
            let server = MockServer::start_async().await;
            let avatar_mock = server
                .mock_async(|when, then| {
                    when.method(GET).path("/fullbody/Salted");
                    then.status(200)
                        .header("content-type", "image/png")
                        .body(encode_png(avatar()).unwrap());
                })
                .await;
            let guild_mock = server
                .mock_async(|when, then| {
                    when.method(GET).path("/guild/IdiotCo");
                    then.status(200).json_body(guild_json());
                })
                .await;

            let output_dir =
                std::env::temp_dir().join(format!("wynnstats-cards-{}", std::process::id()));
            std::fs::create_dir_all(&output_dir).unwrap();
            let handler = handler(&server, card_asset_dir("pipeline"), Some(output_dir.clone()));

            let mut player = player();
            if let Some(membership) = player.guild.as_mut() {
                membership.name = "IdiotCo".to_string();
            }

            let bytes = draw_stats_card(&player, &handler).await.unwrap();
            avatar_mock.assert_async().await;
            guild_mock.assert_async().await;

            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (562, 952));
            assert_eq!(std::fs::read(output_dir.join("Salted.png")).unwrap(), bytes);
        }
    }
}
