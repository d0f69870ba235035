#[cfg(test)]
pub mod tests {
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    use crate::tests::fixtures::{assert_close, guild, player};
    use crate::utils::card::drawing::{fill_annular_sector, fill_rect, fill_rounded_rect};
    use crate::utils::card::layout::{CardLayout, Rect, Widget};
    use crate::utils::card::palette::{Palette, darken, parse_hex};
    use crate::utils::card::pie::{
        CharacterClass, class_levels, draw_donut, gauge_slices, perfection_ring, pie_slices,
    };
    use crate::utils::card::text::{
        CardText, GuildLines, RAIDS, ValueColumn, format_date, format_number, presence_line,
        time_ago,
    };
    use crate::utils::card::{badge_key, encode_png};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use image::{Rgba, RgbaImage};

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    // Group 1: text formatting
    mod text_tests {
        use super::*;

        #[test]
        fn test_time_ago_units() {
            let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
            let cases = [
                (Duration::seconds(1), "1 second ago"),
                (Duration::seconds(30), "30 seconds ago"),
                (Duration::seconds(90), "1 minute ago"),
                (Duration::minutes(45), "45 minutes ago"),
                (Duration::hours(1), "1 hour ago"),
                (Duration::hours(5), "5 hours ago"),
                (Duration::days(10), "10 days ago"),
                (Duration::days(90), "3 months ago"),
                (Duration::days(730), "2 years ago"),
            ];
            for (ago, expected) in cases {
                assert_eq!(time_ago(now - ago, now), expected, "for {:?}", ago);
            }
        }

        #[test]
        fn test_time_ago_just_short_of_a_year() {
            let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
            assert_eq!(time_ago(now - Duration::days(359), now), "11 months ago");
            assert_eq!(time_ago(now - Duration::days(362), now), "1 year ago");
            assert_eq!(time_ago(now - Duration::days(365), now), "1 year ago");
        }

        #[test]
        fn test_time_ago_future_is_zero() {
            let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
            assert_eq!(time_ago(now + Duration::hours(2), now), "0 seconds ago");
        }

        #[test]
        fn test_format_number_suffixes() {
            assert_eq!(format_number(999.0), "999.0");
            assert_eq!(format_number(1500.0), "1.5K");
            assert_eq!(format_number(2_500_000.0), "2.5M");
            assert_eq!(format_number(3_000_000_000.0), "3.0B");
        }

        #[test]
        fn test_format_date() {
            assert_eq!(
                format_date("2014-07-05T18:02:31.000Z").as_deref(),
                Some("Jul 05, 2014")
            );
            assert_eq!(format_date("yesterday"), None);
        }

        #[test]
        fn test_presence_offline() {
            let player = player();
            let now = at("2025-01-10T17:00:00Z");
            assert_eq!(
                presence_line(&player, now).as_deref(),
                Some("last seen 5 hours ago")
            );
        }

        #[test]
        fn test_presence_online_with_world() {
            let mut player = player();
            player.online = true;
            player.server = Some("EU7".to_string());
            assert_eq!(
                presence_line(&player, Utc::now()).as_deref(),
                Some("currently online on world EU7")
            );
        }

        #[test]
        fn test_presence_without_last_join() {
            let mut player = player();
            player.last_join = None;
            assert_eq!(presence_line(&player, Utc::now()), None);
        }
    }

    // Group 2: guild block
    mod guild_lines_tests {
        use super::*;

        #[test]
        fn test_guild_lines_full() {
            let player = player();
            let guild = guild();
            let lines = GuildLines::build(player.guild.as_ref().unwrap(), Some(&guild), "Salted");

            assert_eq!(lines.title, "chief of ICo");
            assert_eq!(lines.since.as_deref(), Some("since May 17, 2020"));
            assert_eq!(lines.name_level.as_deref(), Some("Idiot Co, lv 97"));
            assert_eq!(
                lines.contribution.as_deref(),
                Some("1.5M xp contributed (#4)")
            );
        }

        #[test]
        fn test_guild_lines_without_record() {
            let player = player();
            let lines = GuildLines::build(player.guild.as_ref().unwrap(), None, "Salted");

            assert_eq!(lines.title, "chief of ICo");
            assert!(lines.since.is_none());
            assert!(lines.name_level.is_none());
            assert!(lines.contribution.is_none());
        }

        #[test]
        fn test_guild_lines_unknown_tier_omits_roster_lines() {
            let mut player = player();
            let guild = guild();
            let membership = player.guild.as_mut().unwrap();
            membership.rank = "EMPEROR".to_string();

            let lines = GuildLines::build(membership, Some(&guild), "Salted");
            assert_eq!(lines.title, "emperor of ICo");
            assert!(lines.since.is_none());
            assert!(lines.contribution.is_none());
            assert_eq!(lines.name_level.as_deref(), Some("Idiot Co, lv 97"));
        }

        #[test]
        fn test_card_text_guildless() {
            let mut player = player();
            player.guild = None;
            let text = CardText::build(&player, None, Utc::now());
            assert!(text.guild.is_none());
            assert_eq!(text.first_joined.as_deref(), Some("first joined Jul 05, 2014"));
        }
    }

    // Group 3: stat sections
    mod section_tests {
        use super::*;

        #[test]
        fn test_section_slot_counts() {
            let text = CardText::build(&player(), Some(&guild()), Utc::now());
            let slots: Vec<usize> = text.sections.iter().map(|s| s.slots()).collect();
            assert_eq!(slots, vec![9, 6, 4]);
        }

        #[test]
        fn test_leaderboard_values() {
            let text = CardText::build(&player(), None, Utc::now());
            let values: Vec<String> = text.sections[2]
                .rows
                .iter()
                .flatten()
                .map(|row| row.value.clone())
                .collect();
            assert_eq!(values, vec!["#42", "-", "#1337"]);
        }

        #[test]
        fn test_raid_rows_are_coloured_and_narrow() {
            let text = CardText::build(&player(), None, Utc::now());
            let raids = &text.sections[1];
            assert_eq!(raids.title, "raid completions");

            let rows: Vec<_> = raids.rows.iter().flatten().collect();
            assert_eq!(rows[0].value, "100");
            assert!(rows.iter().all(|row| row.column == ValueColumn::Narrow));
            for (row, raid) in rows[1..].iter().zip(RAIDS.iter()) {
                assert_eq!(row.label, raid.short);
                assert_eq!(row.colour, Some(raid.colour));
            }
            assert_eq!(rows[3].value, "25");
        }

        #[test]
        fn test_playtime_rounded() {
            let text = CardText::build(&player(), None, Utc::now());
            let first = text.sections[0].rows[0].as_ref().unwrap();
            assert_eq!(first.value, "2044 hr");
        }
    }

    // Group 4: layout
    mod layout_tests {
        use super::*;

        const WIDGETS: [Widget; 9] = [
            Widget::Canvas,
            Widget::Header,
            Widget::AvatarPanel,
            Widget::Banner,
            Widget::SidePanel,
            Widget::Footer,
            Widget::RankBadge,
            Widget::StatsColumn,
            Widget::GuildBlock,
        ];

        #[test]
        fn test_widgets_inside_canvas() {
            let layout = CardLayout::STANDARD;
            let canvas = layout.rect(Widget::Canvas);
            assert_eq!((canvas.width, canvas.height), (562, 952));
            for widget in WIDGETS {
                assert!(canvas.contains(&layout.rect(widget)), "{:?} escapes", widget);
            }
        }

        #[test]
        fn test_fixed_regions() {
            let layout = CardLayout::STANDARD;
            assert_eq!(layout.rect(Widget::Banner), Rect::new(281, 102, 281, 588));
            assert_eq!(layout.rect(Widget::SidePanel), Rect::new(0, 536, 281, 154));
            assert_eq!(layout.rect(Widget::Footer), Rect::new(0, 690, 562, 262));
        }

        #[test]
        fn test_sections_stack_by_slot_count() {
            let layout = CardLayout::STANDARD;
            let frames = layout.sections(&[9, 6, 4]);

            let titles: Vec<i32> = frames.iter().map(|f| f.title_y).collect();
            assert_eq!(titles, vec![142, 389, 570]);

            let heights: Vec<u32> = frames.iter().map(|f| f.panel.height).collect();
            assert_eq!(heights, vec![237, 171, 127]);

            let column = layout.rect(Widget::Banner);
            for frame in &frames {
                assert!(column.contains(&frame.panel));
            }
        }

        #[test]
        fn test_row_positions() {
            let layout = CardLayout::STANDARD;
            let frames = layout.sections(&[9]);
            assert_eq!(frames[0].row_y(1, layout.row_step), 169);
            assert_eq!(frames[0].row_y(9, layout.row_step), 345);
        }

        #[test]
        fn test_gauges_spread_across_footer() {
            let layout = CardLayout::STANDARD;
            let centres: Vec<(f32, f32)> = (0..5).map(|i| layout.gauge_center(i, 5)).collect();
            assert!(centres.windows(2).all(|pair| pair[0].0 < pair[1].0));
            assert!(centres.iter().all(|(_, y)| *y == 810.0));
            assert!(centres[0].0 > 45.0 && centres[4].0 < 562.0 - 45.0);
        }
    }

    // Group 5: pies and gauges
    mod pie_tests {
        use super::*;

        #[test]
        fn test_equal_counts_split_evenly() {
            let colour = Rgba([1, 2, 3, 255]);
            let start = 1.234;
            let slices = pie_slices(&[(5, colour); 4], start);
            assert_eq!(slices.len(), 4);
            assert!((slices[0].start - start).abs() < 1e-6);
            for slice in &slices {
                assert!((slice.span() - FRAC_PI_2).abs() < 1e-5);
            }
            assert!((slices[3].end - (start + TAU)).abs() < 1e-5);
        }

        #[test]
        fn test_zero_total_draws_nothing() {
            let colour = Rgba([255, 0, 0, 255]);
            let slices = pie_slices(&[(0, colour), (0, colour)], 0.0);
            assert!(slices.is_empty());

            let mut img = RgbaImage::new(100, 100);
            assert_eq!(draw_donut(&mut img, (50.0, 50.0), 45.0, 35.0, &slices), 0);
            assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
        }

        #[test]
        fn test_zero_values_are_skipped() {
            let colour = Rgba([255, 0, 0, 255]);
            let slices = pie_slices(&[(0, colour), (3, colour), (1, colour)], 0.0);
            assert_eq!(slices.len(), 2);
            assert!((slices[0].span() - 0.75 * TAU).abs() < 1e-5);
        }

        #[test]
        fn test_class_levels_take_highest_character() {
            let levels = class_levels(&player().characters);
            assert_eq!(
                levels,
                [
                    (CharacterClass::Archer, 106),
                    (CharacterClass::Warrior, 0),
                    (CharacterClass::Assassin, 0),
                    (CharacterClass::Mage, 101),
                    (CharacterClass::Shaman, 12),
                ]
            );
        }

        #[test]
        fn test_gauge_clamps_to_max_level() {
            let slices = gauge_slices(CharacterClass::Archer, 106);
            assert_eq!(slices.len(), 1);
            assert!((slices[0].span() - TAU).abs() < 1e-5);
            assert!((slices[0].start + FRAC_PI_2).abs() < 1e-6);
        }

        #[test]
        fn test_gauge_zero_level_is_all_remainder() {
            let slices = gauge_slices(CharacterClass::Warrior, 0);
            assert_eq!(slices.len(), 1);
            assert_eq!(slices[0].colour, Rgba([0, 0, 0, 255]));
        }

        #[test]
        fn test_perfection_ring_only_at_106() {
            assert!(perfection_ring(CharacterClass::Mage, 105).is_none());
            assert!(perfection_ring(CharacterClass::Mage, 107).is_none());
            let ring = perfection_ring(CharacterClass::Mage, 106).unwrap();
            assert_eq!(ring.colour, CharacterClass::Mage.perfection_colour());
        }

        #[test]
        fn test_class_parse() {
            assert_eq!("shaman".parse::<CharacterClass>(), Ok(CharacterClass::Shaman));
            assert!("DARKWIZARD".parse::<CharacterClass>().is_err());
        }
    }

    // Group 6: raster helpers
    mod drawing_tests {
        use super::*;

        #[test]
        fn test_quarter_sector_stays_in_quadrant() {
            let mut img = RgbaImage::new(100, 100);
            let red = Rgba([255, 0, 0, 255]);
            let touched = fill_annular_sector(&mut img, (50.0, 50.0), 45.0, 35.0, 0.0, FRAC_PI_2, red);

            assert!(touched > 0);
            // Screen y grows downwards, so 0..pi/2 is the lower-right quadrant.
            assert_close(*img.get_pixel(90, 55), red);
            assert_eq!(*img.get_pixel(10, 50), Rgba([0, 0, 0, 0]));
            assert_eq!(*img.get_pixel(50, 50), Rgba([0, 0, 0, 0]));
        }

        #[test]
        fn test_full_ring_leaves_hole() {
            let mut img = RgbaImage::new(100, 100);
            let blue = Rgba([0, 0, 255, 255]);
            fill_annular_sector(&mut img, (50.0, 50.0), 45.0, 35.0, -PI, PI, blue);
            assert_close(*img.get_pixel(50, 10), blue);
            assert_close(*img.get_pixel(10, 50), blue);
            assert_eq!(*img.get_pixel(50, 50), Rgba([0, 0, 0, 0]));
        }

        #[test]
        fn test_rounded_rect_skips_corners() {
            let mut img = RgbaImage::new(60, 60);
            let white = Rgba([255, 255, 255, 255]);
            fill_rounded_rect(&mut img, Rect::new(0, 0, 60, 60), 15.0, white);
            assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
            assert_close(*img.get_pixel(30, 30), white);
            assert_close(*img.get_pixel(0, 30), white);
        }

        #[test]
        fn test_fill_rect_blends_and_clips() {
            let mut img = RgbaImage::from_pixel(20, 20, Rgba([200, 200, 200, 255]));
            fill_rect(&mut img, Rect::new(-5, 10, 10, 30), Rgba([0, 0, 0, 128]));

            assert_close(*img.get_pixel(0, 15), Rgba([100, 100, 100, 255]));
            assert_close(*img.get_pixel(4, 19), Rgba([100, 100, 100, 255]));
            assert_eq!(*img.get_pixel(5, 15), Rgba([200, 200, 200, 255]));
            assert_eq!(*img.get_pixel(0, 9), Rgba([200, 200, 200, 255]));
        }

        #[test]
        fn test_fill_rect_empty_is_noop() {
            let mut img = RgbaImage::new(4, 4);
            fill_rect(&mut img, Rect::new(0, 0, 0, 4), Rgba([255, 0, 0, 255]));
            assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
        }

        #[test]
        fn test_encode_png_signature() {
            let bytes = encode_png(RgbaImage::new(4, 4)).unwrap();
            assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        }
    }

    // Group 7: colours and badges
    mod palette_tests {
        use super::*;

        #[test]
        fn test_darkened_lookup_is_case_insensitive() {
            let palette = Palette::default();
            assert_eq!(palette.darkened("silver"), Some(Rgba([57, 57, 55, 255])));
            assert_eq!(palette.darkened(" Silver "), Some(Rgba([57, 57, 55, 255])));
            assert_eq!(palette.darkened("CHARTREUSE"), None);
        }

        #[test]
        fn test_darken_keeps_alpha() {
            assert_eq!(darken(Rgba([200, 100, 50, 77]), 0.5), Rgba([100, 50, 25, 77]));
        }

        #[test]
        fn test_parse_hex() {
            assert_eq!(parse_hex("#fef851"), Some(Rgba([254, 248, 81, 255])));
            assert_eq!(parse_hex("fff"), Some(Rgba([255, 255, 255, 255])));
            assert_eq!(parse_hex("#12345"), None);
            assert_eq!(parse_hex("#zzzzzz"), None);
        }

        #[test]
        fn test_badge_key() {
            assert_eq!(badge_key("nextgen/badges/rank_champion.svg"), Some("rank_champion"));
            assert_eq!(badge_key("/nextgen/badges/rank_vip.svg"), Some("rank_vip"));
            assert_eq!(badge_key("badges/rank_vip.png"), None);
            assert_eq!(badge_key("nextgen/badges/../secret.svg"), None);
            assert_eq!(badge_key("nextgen/badges/.svg"), None);
        }
    }
}
