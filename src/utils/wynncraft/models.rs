//! Response models for the Wynncraft `/v3` API.
//!
//! Only the fields the card uses are required; everything the API may omit or null is an
//! `Option` or falls back to its `Default`.
use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Private profiles send `null` for whole sections; treat that like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub username: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub active_character: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub rank_badge: Option<String>,
    #[serde(default)]
    pub legacy_rank_colour: Option<RankColour>,
    #[serde(default)]
    pub shortened_rank: Option<String>,
    #[serde(default)]
    pub support_rank: Option<String>,
    #[serde(default)]
    pub veteran: Option<bool>,
    #[serde(default)]
    pub first_join: Option<String>,
    #[serde(default)]
    pub last_join: Option<String>,
    #[serde(default)]
    pub playtime: f64,
    #[serde(default)]
    pub guild: Option<GuildMembership>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub global_data: GlobalData,
    #[serde(default)]
    pub forum_link: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ranking: Ranking,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_ranking: Ranking,
    #[serde(default)]
    pub public_profile: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub characters: HashMap<String, Character>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RankColour {
    pub main: String,
    pub sub: String,
}

/// The short guild summary embedded in a player response.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuildMembership {
    #[serde(default)]
    pub uuid: String,
    pub name: String,
    pub prefix: String,
    pub rank: String,
    #[serde(default)]
    pub rank_stars: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalData {
    #[serde(default)]
    pub wars: u64,
    #[serde(default)]
    pub total_level: u64,
    #[serde(default)]
    pub killed_mobs: u64,
    #[serde(default)]
    pub chests_found: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dungeons: ContentSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raids: ContentSummary,
    #[serde(default)]
    pub completed_quests: u64,
    #[serde(default)]
    pub pvp: PvpStats,
}

/// Dungeon or raid completions, total plus a per-name breakdown.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContentSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub list: HashMap<String, u64>,
}

impl ContentSummary {
    pub fn count(&self, name: &str) -> u64 {
        self.list.get(name).copied().unwrap_or(0)
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PvpStats {
    #[serde(default)]
    pub kills: Option<u64>,
    #[serde(default)]
    pub deaths: Option<u64>,
}

/// Global leaderboard positions keyed by category (`globalPlayerContent`, `warsCompletion`, ...).
///
/// The API only lists categories the player is ranked in.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Ranking(pub HashMap<String, u64>);

impl Ranking {
    pub const COMPLETION: &'static str = "globalPlayerContent";
    pub const PROFESSIONS: &'static str = "professionsGlobalLevel";
    pub const WARS: &'static str = "warsCompletion";

    pub fn position(&self, category: &str) -> Option<u64> {
        self.0.get(category).copied()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(rename = "type")]
    pub class_type: String,
    #[serde(default)]
    pub reskin: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub xp_percent: u32,
    #[serde(default)]
    pub total_level: u32,
    #[serde(default)]
    pub wars: u64,
    #[serde(default)]
    pub playtime: f64,
    #[serde(default)]
    pub mobs_killed: u64,
    #[serde(default)]
    pub chests_found: u64,
    #[serde(default)]
    pub deaths: u64,
    #[serde(default)]
    pub professions: HashMap<String, Profession>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dungeons: ContentSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raids: ContentSummary,
    #[serde(default)]
    pub quests: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profession {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp_percent: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuildRecord {
    #[serde(default)]
    pub uuid: String,
    pub name: String,
    pub prefix: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp_percent: u32,
    #[serde(default)]
    pub territories: u32,
    #[serde(default)]
    pub wars: Option<u64>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub members: Members,
    #[serde(default)]
    pub online: u32,
    #[serde(default)]
    pub banner: Option<BannerDescriptor>,
    #[serde(default)]
    pub season_ranks: HashMap<String, SeasonRank>,
}

/// Guild roster, one sub-mapping (username -> entry) per rank tier.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Members {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub owner: HashMap<String, MemberEntry>,
    #[serde(default)]
    pub chief: HashMap<String, MemberEntry>,
    #[serde(default)]
    pub strategist: HashMap<String, MemberEntry>,
    #[serde(default)]
    pub captain: HashMap<String, MemberEntry>,
    #[serde(default)]
    pub recruiter: HashMap<String, MemberEntry>,
    #[serde(default)]
    pub recruit: HashMap<String, MemberEntry>,
}

/// A roster entry. Depending on the tier the API fills either `guild_rank` or
/// `contribution_rank`, never both; use [`MemberEntry::rank_position`] to read it.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub contributed: u64,
    #[serde(default)]
    pub guild_rank: Option<u32>,
    #[serde(default)]
    pub contribution_rank: Option<u32>,
    #[serde(default)]
    pub joined: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BannerDescriptor {
    pub base: String,
    #[serde(default)]
    pub tier: u32,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub layers: Vec<BannerLayer>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BannerLayer {
    pub colour: String,
    pub pattern: String,
}

impl BannerLayer {
    pub fn new(colour: &str, pattern: &str) -> Self {
        BannerLayer {
            colour: colour.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRank {
    #[serde(default)]
    pub rating: u64,
    #[serde(default)]
    pub final_territories: u32,
}
