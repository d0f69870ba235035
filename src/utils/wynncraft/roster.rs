use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::models::{GuildRecord, MemberEntry, Members};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Unknown guild rank tier: '{0}'")]
    UnknownRankTier(String),
    #[error("'{username}' is not listed under {tier} in the guild roster")]
    NotInRoster { username: String, tier: RankTier },
}

/// The six in-game guild rank tiers, highest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RankTier {
    Owner,
    Chief,
    Strategist,
    Captain,
    Recruiter,
    Recruit,
}

impl RankTier {
    pub const ALL: [RankTier; 6] = [
        Self::Owner,
        Self::Chief,
        Self::Strategist,
        Self::Captain,
        Self::Recruiter,
        Self::Recruit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Chief => "chief",
            Self::Strategist => "strategist",
            Self::Captain => "captain",
            Self::Recruiter => "recruiter",
            Self::Recruit => "recruit",
        }
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankTier {
    type Err = RosterError;

    /// Parses the rank string from a player's guild summary (`"OWNER"`, `"recruit"`, ...).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == wanted)
            .ok_or_else(|| RosterError::UnknownRankTier(raw.to_string()))
    }
}

/// Which leaderboard a roster entry's position refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RankPosition {
    Guild(u32),
    Contribution(u32),
}

impl RankPosition {
    pub fn value(&self) -> u32 {
        match self {
            Self::Guild(n) | Self::Contribution(n) => *n,
        }
    }
}

impl MemberEntry {
    /// Reads whichever of `contributionRank` / `guildRank` the API filled in.
    pub fn rank_position(&self) -> Option<RankPosition> {
        self.contribution_rank
            .map(RankPosition::Contribution)
            .or(self.guild_rank.map(RankPosition::Guild))
    }
}

impl Members {
    pub fn roster(&self, tier: RankTier) -> &HashMap<String, MemberEntry> {
        match tier {
            RankTier::Owner => &self.owner,
            RankTier::Chief => &self.chief,
            RankTier::Strategist => &self.strategist,
            RankTier::Captain => &self.captain,
            RankTier::Recruiter => &self.recruiter,
            RankTier::Recruit => &self.recruit,
        }
    }
}

impl GuildRecord {
    /// Looks up `username` in the roster of the tier named by `rank`.
    pub fn membership(&self, rank: &str, username: &str) -> Result<&MemberEntry, RosterError> {
        let tier = rank.parse::<RankTier>()?;
        self.members
            .roster(tier)
            .get(username)
            .ok_or_else(|| RosterError::NotInRoster {
                username: username.to_string(),
                tier,
            })
    }
}
