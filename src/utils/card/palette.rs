use std::collections::HashMap;

use image::Rgba;

/// Channel multiplier applied to every symbolic colour before it is used on a banner.
pub const DARKEN_FACTOR: f32 = 0.5;

/// The sixteen dye colours the Wynncraft API uses for guild banners.
const DYES: [(&str, [u8; 3]); 16] = [
    ("BLACK", [21, 21, 24]),
    ("RED", [129, 34, 28]),
    ("GREEN", [69, 91, 16]),
    ("BROWN", [96, 62, 37]),
    ("BLUE", [43, 49, 123]),
    ("PURPLE", [100, 37, 135]),
    ("CYAN", [16, 114, 114]),
    ("SILVER", [115, 115, 111]),
    ("GRAY", [52, 57, 60]),
    ("PINK", [179, 102, 125]),
    ("LIME", [93, 145, 22]),
    ("YELLOW", [186, 158, 45]),
    ("LIGHT_BLUE", [42, 131, 160]),
    ("MAGENTA", [145, 57, 138]),
    ("ORANGE", [180, 93, 21]),
    ("WHITE", [182, 187, 186]),
];

/// Dye colours as they appear on banners, already darkened.
///
/// Built once at startup and shared by reference; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Palette {
    darkened: HashMap<&'static str, Rgba<u8>>,
}

impl Palette {
    pub fn new() -> Self {
        Self::with_darken_factor(DARKEN_FACTOR)
    }

    pub fn with_darken_factor(factor: f32) -> Self {
        let darkened = DYES
            .iter()
            .map(|(name, [r, g, b])| (*name, darken(Rgba([*r, *g, *b, 255]), factor)))
            .collect();

        Palette { darkened }
    }

    /// Banner-context lookup: the same names, dimmed by the darken factor.
    pub fn darkened(&self, name: &str) -> Option<Rgba<u8>> {
        self.darkened.get(name.trim().to_ascii_uppercase().as_str()).copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

/// Scales RGB by `factor`, leaving alpha untouched.
pub fn darken(colour: Rgba<u8>, factor: f32) -> Rgba<u8> {
    let [r, g, b, a] = colour.0;
    let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
    Rgba([scale(r), scale(g), scale(b), a])
}

/// Parses `#rrggbb` / `rrggbb` (and the 3-digit short form) into an opaque colour.
pub fn parse_hex(raw: &str) -> Option<Rgba<u8>> {
    let hex = raw.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

