use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::str::FromStr;

use image::{Rgba, RgbaImage};

use super::drawing::fill_annular_sector;
use crate::utils::wynncraft::Character;

/// Level at which a class gauge is full.
pub const MAX_LEVEL: u32 = 105;
/// Level that earns the inner perfection ring.
pub const PERFECTION_LEVEL: u32 = 106;

const GAUGE_REMAINDER: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub start: f32,
    pub end: f32,
    pub colour: Rgba<u8>,
}

impl PieSlice {
    #[cfg(test)]
    pub fn span(&self) -> f32 {
        self.end - self.start
    }
}

/// Splits a full turn proportionally between `values`, beginning at `start`.
///
/// Zero-valued entries get no slice; a zero total yields no slices at all.
pub fn pie_slices(values: &[(u64, Rgba<u8>)], start: f32) -> Vec<PieSlice> {
    let total: u64 = values.iter().map(|(v, _)| v).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut angle = start;
    values
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|&(value, colour)| {
            let end = angle + (value as f32 / total as f32) * TAU;
            let slice = PieSlice {
                start: angle,
                end,
                colour,
            };
            angle = end;
            slice
        })
        .collect()
}

/// Random starting angle for the raid donut.
pub fn random_start_angle() -> f32 {
    rand::random::<f32>() * TAU
}

/// Draws `slices` as a ring between `inner` and `outer`. Returns the pixels touched.
pub fn draw_donut(
    img: &mut RgbaImage,
    center: (f32, f32),
    outer: f32,
    inner: f32,
    slices: &[PieSlice],
) -> usize {
    slices
        .iter()
        .map(|slice| {
            fill_annular_sector(
                img,
                center,
                outer,
                inner,
                slice.start,
                slice.end,
                slice.colour,
            )
        })
        .sum()
}

/// The five base character classes, in footer order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Archer,
    Warrior,
    Assassin,
    Mage,
    Shaman,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 5] = [
        Self::Archer,
        Self::Warrior,
        Self::Assassin,
        Self::Mage,
        Self::Shaman,
    ];

    /// API name, also the class icon's asset name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archer => "ARCHER",
            Self::Warrior => "WARRIOR",
            Self::Assassin => "ASSASSIN",
            Self::Mage => "MAGE",
            Self::Shaman => "SHAMAN",
        }
    }

    pub fn colour(&self) -> Rgba<u8> {
        match self {
            Self::Archer => Rgba([0x89, 0x36, 0xb3, 255]),
            Self::Warrior => Rgba([0xb3, 0x40, 0x36, 255]),
            Self::Assassin => Rgba([0x36, 0xb3, 0xb3, 255]),
            Self::Mage => Rgba([0xb3, 0x89, 0x36, 255]),
            Self::Shaman => Rgba([0x5f, 0xb3, 0x36, 255]),
        }
    }

    pub fn perfection_colour(&self) -> Rgba<u8> {
        match self {
            Self::Archer => Rgba([0x62, 0x26, 0x80, 255]),
            Self::Warrior => Rgba([0x80, 0x2e, 0x26, 255]),
            Self::Assassin => Rgba([0x26, 0x80, 0x80, 255]),
            Self::Mage => Rgba([0x80, 0x62, 0x26, 255]),
            Self::Shaman => Rgba([0x44, 0x80, 0x26, 255]),
        }
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == wanted)
            .ok_or_else(|| format!("unknown class '{}'", raw))
    }
}

/// Highest level per class over all of the player's characters; classes without a character are 0.
pub fn class_levels(characters: &HashMap<String, Character>) -> [(CharacterClass, u32); 5] {
    let mut levels = CharacterClass::ALL.map(|class| (class, 0));
    for character in characters.values() {
        let Ok(class) = character.class_type.parse::<CharacterClass>() else {
            tracing::debug!(
                "[CARD] Ignoring character with unknown class '{}'",
                character.class_type
            );
            continue;
        };
        if let Some((_, level)) = levels.iter_mut().find(|(c, _)| *c == class) {
            *level = (*level).max(character.level);
        }
    }
    levels
}

/// Filled arc for `level / 105` against a black remainder, starting at twelve o'clock.
pub fn gauge_slices(class: CharacterClass, level: u32) -> Vec<PieSlice> {
    let filled = level.min(MAX_LEVEL) as u64;
    pie_slices(
        &[
            (filled, class.colour()),
            (MAX_LEVEL as u64 - filled, GAUGE_REMAINDER),
        ],
        -FRAC_PI_2,
    )
}

/// Full inner ring drawn only at exactly the perfection level.
pub fn perfection_ring(class: CharacterClass, level: u32) -> Option<PieSlice> {
    (level == PERFECTION_LEVEL).then(|| PieSlice {
        start: -FRAC_PI_2,
        end: -FRAC_PI_2 + TAU,
        colour: class.perfection_colour(),
    })
}
