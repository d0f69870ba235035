use chrono::{DateTime, Utc};

use crate::utils::wynncraft::{GuildMembership, GuildRecord, PlayerRecord, Ranking};

/// Formats a count with a K/M/B suffix and one decimal place.
pub fn format_number(n: f64) -> String {
    if n >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.1}K", n / 1e3)
    } else {
        format!("{:.1}", n)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// `2021-03-04T...` -> `Mar 04, 2021`.
pub fn format_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("%b %d, %Y").to_string())
}

fn pluralize(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{} {} ago", value, unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

/// Relative time between `then` and `now`, e.g. `5 hours ago`.
///
/// Months are 30 days and only used below 360 days; years are 365 days, never fewer than one.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds().max(0);
    let hours = seconds / 3600;

    if seconds < 60 {
        pluralize(seconds, "second")
    } else if seconds < 3600 {
        pluralize(seconds / 60, "minute")
    } else if hours < 24 {
        pluralize(hours, "hour")
    } else if hours < 24 * 30 {
        pluralize(hours / 24, "day")
    } else if hours < 24 * 30 * 12 {
        pluralize(hours / (24 * 30), "month")
    } else {
        pluralize((hours / (24 * 365)).max(1), "year")
    }
}

/// `online on world X` / `last seen ...` line. `None` when there is nothing to say.
pub fn presence_line(player: &PlayerRecord, now: DateTime<Utc>) -> Option<String> {
    let world = player.server.as_deref();
    if player.online {
        return Some(match world {
            Some(server) => format!("currently online on world {}", server),
            None => "currently online".to_string(),
        });
    }

    let last_seen = player.last_join.as_deref().and_then(parse_timestamp)?;
    let mut line = format!("last seen {}", time_ago(last_seen, now));
    if let Some(server) = world {
        line.push_str(&format!(" on world {}", server));
    }
    Some(line)
}

/// Guild lines shown in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildLines {
    pub title: String,
    pub since: Option<String>,
    pub name_level: Option<String>,
    pub contribution: Option<String>,
}

impl GuildLines {
    /// `record` is `None` when the guild lookup failed; only the summary line is shown then.
    pub fn build(
        membership: &GuildMembership,
        record: Option<&GuildRecord>,
        username: &str,
    ) -> Self {
        let title = format!(
            "{} of {}",
            membership.rank.to_lowercase(),
            record.map_or(membership.prefix.as_str(), |g| g.prefix.as_str())
        );

        let Some(guild) = record else {
            return GuildLines {
                title,
                since: None,
                name_level: None,
                contribution: None,
            };
        };

        let entry = match guild.membership(&membership.rank, username) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("[CARD] Guild roster lookup failed: {}", e);
                None
            }
        };

        GuildLines {
            title,
            since: entry
                .and_then(|e| e.joined.as_deref())
                .and_then(format_date)
                .map(|date| format!("since {}", date)),
            name_level: Some(format!("{}, lv {}", guild.name, guild.level)),
            contribution: entry.map(|e| {
                let mut line = format!("{} xp contributed", format_number(e.contributed as f64));
                if let Some(position) = e.rank_position() {
                    line.push_str(&format!(" (#{})", position.value()));
                }
                line
            }),
        }
    }
}

/// Which value column a stat row uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueColumn {
    Wide,
    Narrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: String,
    pub column: ValueColumn,
    pub colour: Option<image::Rgba<u8>>,
}

impl StatRow {
    fn wide(label: &'static str, value: String) -> Self {
        StatRow {
            label,
            value,
            column: ValueColumn::Wide,
            colour: None,
        }
    }

    fn narrow(label: &'static str, value: String) -> Self {
        StatRow {
            label,
            value,
            column: ValueColumn::Narrow,
            colour: None,
        }
    }
}

/// A titled block of rows; `None` entries are blank spacer slots.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSection {
    pub title: &'static str,
    pub rows: Vec<Option<StatRow>>,
}

impl StatSection {
    pub fn slots(&self) -> usize {
        self.rows.len()
    }
}

/// One of the four tracked raids.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Raid {
    pub short: &'static str,
    pub name: &'static str,
    pub colour: image::Rgba<u8>,
}

pub const RAIDS: [Raid; 4] = [
    Raid {
        short: "nog",
        name: "Nest of the Grootslangs",
        colour: image::Rgba([0x93, 0xc4, 0x7d, 255]),
    },
    Raid {
        short: "nol",
        name: "Orphion's Nexus of Light",
        colour: image::Rgba([0xff, 0xd9, 0x66, 255]),
    },
    Raid {
        short: "tcc",
        name: "The Canyon Colossus",
        colour: image::Rgba([0xe0, 0x66, 0x66, 255]),
    },
    Raid {
        short: "tna",
        name: "The Nameless Anomaly",
        colour: image::Rgba([0x8e, 0x7c, 0xc3, 255]),
    },
];

fn leaderboard(ranking: &Ranking, category: &str) -> String {
    ranking
        .position(category)
        .map_or_else(|| "-".to_string(), |pos| format!("#{}", pos))
}

/// The three stat sections in drawing order: player stats, raid completions, leaderboards.
pub fn stat_sections(player: &PlayerRecord) -> [StatSection; 3] {
    let global = &player.global_data;

    let player_stats = StatSection {
        title: "player stats",
        rows: vec![
            Some(StatRow::wide(
                "playtime",
                format!("{} hr", player.playtime.round() as i64),
            )),
            Some(StatRow::wide("total levels", global.total_level.to_string())),
            None,
            Some(StatRow::wide("kills", global.killed_mobs.to_string())),
            Some(StatRow::wide("chests", global.chests_found.to_string())),
            Some(StatRow::wide("dungeons", global.dungeons.total.to_string())),
            Some(StatRow::wide("quests", global.completed_quests.to_string())),
            None,
            Some(StatRow::wide("wars", global.wars.to_string())),
        ],
    };

    let mut raid_rows = vec![
        Some(StatRow::narrow("total", global.raids.total.to_string())),
        None,
    ];
    raid_rows.extend(RAIDS.iter().map(|raid| {
        Some(StatRow {
            colour: Some(raid.colour),
            ..StatRow::narrow(raid.short, global.raids.count(raid.name).to_string())
        })
    }));
    let raids = StatSection {
        title: "raid completions",
        rows: raid_rows,
    };

    let leaderboards = StatSection {
        title: "leaderboards",
        rows: vec![
            Some(StatRow::wide(
                "completion",
                leaderboard(&player.ranking, Ranking::COMPLETION),
            )),
            Some(StatRow::wide(
                "professions",
                leaderboard(&player.ranking, Ranking::PROFESSIONS),
            )),
            None,
            Some(StatRow::wide(
                "wars won",
                leaderboard(&player.ranking, Ranking::WARS),
            )),
        ],
    };

    [player_stats, raids, leaderboards]
}

/// Everything textual on the card, resolved before any drawing happens.
#[derive(Debug, Clone, PartialEq)]
pub struct CardText {
    pub username: String,
    pub first_joined: Option<String>,
    pub presence: Option<String>,
    pub guild: Option<GuildLines>,
    pub sections: [StatSection; 3],
}

impl CardText {
    pub fn build(player: &PlayerRecord, guild: Option<&GuildRecord>, now: DateTime<Utc>) -> Self {
        CardText {
            username: player.username.clone(),
            first_joined: player
                .first_join
                .as_deref()
                .and_then(format_date)
                .map(|date| format!("first joined {}", date)),
            presence: presence_line(player, now),
            guild: player
                .guild
                .as_ref()
                .map(|membership| GuildLines::build(membership, guild, &player.username)),
            sections: stat_sections(player),
        }
    }
}
