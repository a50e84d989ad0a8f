use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::classify::{BROWN, GOLD, LIGHT_BROWN, SANDY_BEIGE};

/// Custom colors remembered by [`RecentColors`].
pub const MAX_CUSTOM_COLORS: usize = 20;

/// Recent colors offered for quick picks (`:fg 1` .. `:fg 6`).
pub const RECENT_COLOR_PICKS: usize = 6;

/// Named colors available without typing hex.
pub static PRESET_COLORS: &[(&str, Argb)] = &[
    ("black", Argb::BLACK),
    ("white", Argb::WHITE),
    ("brown", BROWN),
    ("lightbrown", LIGHT_BROWN),
    ("gold", GOLD),
    ("beige", SANDY_BEIGE),
    ("blue", Argb::from_rgb(0x2E, 0x86, 0xAB)),
    ("green", Argb::from_rgb(0x27, 0xAE, 0x60)),
    ("red", Argb::from_rgb(0xE7, 0x4C, 0x3C)),
    ("orange", Argb::from_rgb(0xF3, 0x9C, 0x12)),
    ("purple", Argb::from_rgb(0x9B, 0x59, 0xB6)),
    ("sky", Argb::from_rgb(0x1D, 0xA1, 0xF2)),
];

pub fn preset_color(name: &str) -> Option<Argb> {
    let name = name.trim();
    PRESET_COLORS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|(_, color)| *color)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color: {0}")]
    InvalidHex(String),
}

/// A packed 32-bit `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argb(pub u32);

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Argb {
    pub const BLACK: Argb = Argb(0xFF00_0000);
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Argb(0xFF00_0000 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red(), self.green(), self.blue())
    }

    /// Accepts `RRGGBB` or `AARRGGBB`, with or without a leading `#`.
    /// Six-digit input is fully opaque.
    pub fn parse_hex(input: &str) -> Result<Self, ColorError> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(input.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorError::InvalidHex(input.to_string()))?;
        match digits.len() {
            6 => Ok(Argb(0xFF00_0000 | value)),
            8 => Ok(Argb(value)),
            _ => Err(ColorError::InvalidHex(input.to_string())),
        }
    }

    pub fn to_hsv(self) -> Hsv {
        let r = f32::from(self.red()) / 255.0;
        let g = f32::from(self.green()) / 255.0;
        let b = f32::from(self.blue()) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        Hsv {
            hue,
            saturation,
            value: max,
        }
    }

    pub fn from_hsv(hsv: Hsv) -> Self {
        let hue = hsv.hue.rem_euclid(360.0);
        let saturation = hsv.saturation.clamp(0.0, 1.0);
        let value = hsv.value.clamp(0.0, 1.0);

        let chroma = value * saturation;
        let x = chroma * (1.0 - ((hue / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = value - chroma;

        let (r, g, b) = match hue {
            h if h < 60.0 => (chroma, x, 0.0),
            h if h < 120.0 => (x, chroma, 0.0),
            h if h < 180.0 => (0.0, chroma, x),
            h if h < 240.0 => (0.0, x, chroma),
            h if h < 300.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let channel = |c: f32| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Argb::from_rgb(channel(r), channel(g), channel(b))
    }

    /// Perceived brightness in `[0, 1]`.
    pub fn luminance(self) -> f32 {
        (0.299 * f32::from(self.red()) + 0.587 * f32::from(self.green())
            + 0.114 * f32::from(self.blue()))
            / 255.0
    }

    /// True when every RGB channel differs by less than `tolerance` (in `[0, 1]` units).
    pub fn is_similar_to(self, other: Argb, tolerance: f32) -> bool {
        let close = |a: u8, b: u8| (f32::from(a) - f32::from(b)).abs() / 255.0 < tolerance;
        close(self.red(), other.red())
            && close(self.green(), other.green())
            && close(self.blue(), other.blue())
    }

    pub fn to_stored(self) -> i64 {
        i64::from(self.0)
    }

    /// Masks to 32 bits so values written as signed ints read back unchanged.
    pub fn from_stored(value: i64) -> Self {
        Argb((value & 0xFFFF_FFFF) as u32)
    }
}

/// The two colors a code is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderColors {
    pub foreground: Argb,
    pub background: Argb,
}

impl Default for RenderColors {
    fn default() -> Self {
        Self {
            foreground: Argb::BLACK,
            background: Argb::WHITE,
        }
    }
}

impl RenderColors {
    /// Scanners need contrast between the modules and the quiet zone.
    pub fn has_low_contrast(&self) -> bool {
        (self.foreground.luminance() - self.background.luminance()).abs() < 0.3
            || self.foreground.is_similar_to(self.background, 0.1)
    }
}

/// One remembered custom color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorUse {
    pub color: Argb,
    pub uses: u32,
    /// Logical clock value of the latest use.
    pub last_used: u64,
}

/// Custom colors the user has applied, deduplicated by RGB hex, kept sorted by
/// use count and then by most recent use, and capped at [`MAX_CUSTOM_COLORS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentColors {
    entries: Vec<ColorUse>,
    clock: u64,
}

impl RecentColors {
    pub fn record(&mut self, color: Argb) {
        self.clock += 1;
        let hex = color.to_hex();
        match self.entries.iter_mut().find(|e| e.color.to_hex() == hex) {
            Some(entry) => {
                entry.uses += 1;
                entry.last_used = self.clock;
            }
            None => {
                self.entries.insert(
                    0,
                    ColorUse {
                        color,
                        uses: 1,
                        last_used: self.clock,
                    },
                );
                if self.entries.len() > MAX_CUSTOM_COLORS {
                    self.entries.pop();
                }
            }
        }
        self.entries.sort_by(|a, b| {
            b.uses
                .cmp(&a.uses)
                .then_with(|| b.last_used.cmp(&a.last_used))
        });
    }

    pub fn entries(&self) -> &[ColorUse] {
        &self.entries
    }

    /// The first `limit` entries in list order.
    pub fn recent(&self, limit: usize) -> Vec<Argb> {
        self.entries.iter().take(limit).map(|e| e.color).collect()
    }

    /// Highest use counts first, ignoring recency.
    pub fn most_used(&self, limit: usize) -> Vec<Argb> {
        let mut by_uses = self.entries.clone();
        by_uses.sort_by(|a, b| b.uses.cmp(&a.uses));
        by_uses.into_iter().take(limit).map(|e| e.color).collect()
    }

    /// 1-based quick pick among the first [`RECENT_COLOR_PICKS`] entries.
    pub fn pick(&self, n: usize) -> Option<Argb> {
        if n == 0 || n > RECENT_COLOR_PICKS {
            return None;
        }
        self.entries.get(n - 1).map(|e| e.color)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Argb {
    fn default() -> Self {
        Argb::BLACK
    }
}

impl std::fmt::Display for Argb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.alpha() == 0xFF {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "#{:08X}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_rgb_and_argb() {
        assert_eq!(Argb::parse_hex("#6F4E37").unwrap(), Argb(0xFF6F_4E37));
        assert_eq!(Argb::parse_hex("ecb176").unwrap(), Argb(0xFFEC_B176));
        assert_eq!(Argb::parse_hex("#80FFFFFF").unwrap(), Argb(0x80FF_FFFF));
        assert!(Argb::parse_hex("#12345").is_err());
        assert!(Argb::parse_hex("#GGGGGG").is_err());
        assert!(Argb::parse_hex("+123456").is_err());
    }

    #[test]
    fn to_hex_drops_alpha() {
        assert_eq!(Argb::BLACK.to_hex(), "#000000");
        assert_eq!(Argb(0x80A6_7B5B).to_hex(), "#A67B5B");
        assert_eq!(Argb(0x80A6_7B5B).to_string(), "#80A67B5B");
        assert_eq!(Argb::WHITE.to_string(), "#FFFFFF");
    }

    #[test]
    fn hsv_primaries() {
        let red = Argb::from_rgb(255, 0, 0).to_hsv();
        assert_eq!(red.hue, 0.0);
        assert_eq!(red.saturation, 1.0);
        assert_eq!(red.value, 1.0);

        let blue = Argb::from_rgb(0, 0, 255).to_hsv();
        assert!((blue.hue - 240.0).abs() < 0.01);

        let gray = Argb::from_rgb(128, 128, 128).to_hsv();
        assert_eq!(gray.saturation, 0.0);
    }

    #[test]
    fn hsv_conversion_is_stable_for_palette() {
        for color in [
            Argb::from_rgb(0x6F, 0x4E, 0x37),
            Argb::from_rgb(0xEC, 0xB1, 0x76),
            Argb::from_rgb(0xFE, 0xD8, 0xB1),
            Argb::BLACK,
            Argb::WHITE,
        ] {
            assert_eq!(Argb::from_hsv(color.to_hsv()), color);
        }
    }

    #[test]
    fn luminance_and_similarity() {
        assert_eq!(Argb::BLACK.luminance(), 0.0);
        assert!((Argb::WHITE.luminance() - 1.0).abs() < 0.001);
        assert!(Argb::from_rgb(10, 10, 10).is_similar_to(Argb::BLACK, 0.1));
        assert!(!Argb::WHITE.is_similar_to(Argb::BLACK, 0.1));
    }

    #[test]
    fn render_colors_contrast() {
        assert!(!RenderColors::default().has_low_contrast());
        let muddy = RenderColors {
            foreground: Argb::from_rgb(0x6F, 0x4E, 0x37),
            background: Argb::from_rgb(0x80, 0x5A, 0x40),
        };
        assert!(muddy.has_low_contrast());
    }

    #[test]
    fn recent_colors_dedupe_by_hex_and_rank_by_use() {
        let mut recent = RecentColors::default();
        let brown = Argb::from_rgb(0x6F, 0x4E, 0x37);
        let gold = Argb::from_rgb(0xEC, 0xB1, 0x76);

        recent.record(brown);
        recent.record(gold);
        assert_eq!(recent.recent(6), vec![gold, brown]);

        // Alpha is ignored when matching
        recent.record(Argb(0x806F_4E37));
        assert_eq!(recent.entries().len(), 2);
        assert_eq!(recent.entries()[0].color, brown);
        assert_eq!(recent.entries()[0].uses, 2);
        assert_eq!(recent.pick(1), Some(brown));
        assert_eq!(recent.pick(2), Some(gold));
        assert_eq!(recent.pick(3), None);
        assert_eq!(recent.pick(0), None);
    }

    #[test]
    fn recent_colors_are_capped() {
        let mut recent = RecentColors::default();
        let favourite = Argb::from_rgb(1, 2, 3);
        recent.record(favourite);
        recent.record(favourite);
        for i in 0..30u8 {
            recent.record(Argb::from_rgb(i, i, 200));
        }

        assert_eq!(recent.entries().len(), MAX_CUSTOM_COLORS);
        assert_eq!(recent.entries()[0].color, favourite);
        // Among single uses the newest comes first
        assert_eq!(recent.entries()[1].color, Argb::from_rgb(29, 29, 200));
        assert!(!recent.recent(6).contains(&Argb::from_rgb(0, 0, 200)));
        assert_eq!(recent.most_used(1), vec![favourite]);

        recent.clear();
        assert!(recent.is_empty());
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(preset_color("Gold"), Some(Argb::from_rgb(0xEC, 0xB1, 0x76)));
        assert_eq!(preset_color(" black "), Some(Argb::BLACK));
        assert_eq!(preset_color("chartreuse"), None);
    }

    #[test]
    fn stored_value_masks_sign_extension() {
        assert_eq!(Argb::WHITE.to_stored(), 0xFFFF_FFFF);
        assert_eq!(Argb::from_stored(-1), Argb::WHITE);
        assert_eq!(Argb::from_stored(i64::from(-16_777_216_i32)), Argb::BLACK);
    }
}
