use ratatui::style::Color;

use crate::domain::{classify, Argb, CategoryKey};

/// Colors every widget draws with. One per [`ThemeMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    // Backgrounds
    pub bg_dark: Color,
    pub bg_bar: Color,
    pub bg_surface: Color,
    pub bg_highlight: Color,

    // Primary accent (coffee)
    pub accent: Color,
    pub accent_dim: Color,

    // Text
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    // Semantic
    pub green: Color,
    pub red: Color,
    pub yellow: Color,
}

pub const DARK: Palette = Palette {
    bg_dark: Color::Rgb(24, 17, 13),
    bg_bar: Color::Rgb(33, 24, 18),
    bg_surface: Color::Rgb(44, 32, 24),
    bg_highlight: Color::Rgb(62, 45, 33),
    accent: argb(classify::GOLD),
    accent_dim: argb(classify::LIGHT_BROWN),
    text: Color::Rgb(236, 226, 214),
    text_dim: Color::Rgb(168, 150, 132),
    text_muted: Color::Rgb(110, 94, 80),
    green: Color::Rgb(134, 197, 120),
    red: Color::Rgb(235, 111, 96),
    yellow: Color::Rgb(240, 196, 96),
};

// Pale orange / pale yellow / light peach surfaces with brown ink
pub const LIGHT: Palette = Palette {
    bg_dark: Color::Rgb(0xFF, 0xF2, 0xEB),
    bg_bar: Color::Rgb(0xFF, 0xE8, 0xCD),
    bg_surface: Color::Rgb(0xFF, 0xD6, 0xBA),
    bg_highlight: argb(classify::SANDY_BEIGE),
    accent: argb(classify::BROWN),
    accent_dim: argb(classify::LIGHT_BROWN),
    text: Color::Rgb(43, 30, 22),
    text_dim: Color::Rgb(92, 66, 48),
    text_muted: Color::Rgb(140, 112, 90),
    green: Color::Rgb(46, 125, 50),
    red: Color::Rgb(183, 28, 28),
    yellow: Color::Rgb(158, 105, 0),
};

pub const HIGH_CONTRAST: Palette = Palette {
    bg_dark: Color::Rgb(0, 0, 0),
    bg_bar: Color::Rgb(0, 0, 0),
    bg_surface: Color::Rgb(0, 0, 0),
    bg_highlight: Color::Rgb(70, 70, 70),
    accent: Color::Rgb(255, 215, 0),
    accent_dim: Color::Rgb(255, 255, 255),
    text: Color::Rgb(255, 255, 255),
    text_dim: Color::Rgb(255, 255, 255),
    text_muted: Color::Rgb(210, 210, 210),
    green: Color::Rgb(0, 255, 0),
    red: Color::Rgb(255, 90, 90),
    yellow: Color::Rgb(255, 255, 0),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
    HighContrast,
}

impl ThemeMode {
    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Dark => &DARK,
            Self::Light => &LIGHT,
            Self::HighContrast => &HIGH_CONTRAST,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::HighContrast => "high-contrast",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "contrast" | "high-contrast" | "hc" => Some(Self::HighContrast),
            _ => None,
        }
    }

    /// Dark and light swap; high contrast goes back to dark.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light | Self::HighContrast => Self::Dark,
        }
    }
}

pub const fn argb(color: Argb) -> Color {
    Color::Rgb(color.red(), color.green(), color.blue())
}

/// Terminal stand-in for a category icon.
pub fn glyph(key: CategoryKey) -> &'static str {
    match key {
        CategoryKey::Email => "✉",
        CategoryKey::Url => "🔗",
        CategoryKey::Text => "¶",
        CategoryKey::Scanned => "⌖",
        CategoryKey::Sms => "✆",
        CategoryKey::Twitter => "#",
        CategoryKey::Wifi => "≋",
        CategoryKey::Generic => "▣",
    }
}
