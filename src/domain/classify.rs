use super::color::Argb;

// Coffee palette
pub const BROWN: Argb = Argb::from_rgb(0x6F, 0x4E, 0x37);
pub const LIGHT_BROWN: Argb = Argb::from_rgb(0xA6, 0x7B, 0x5B);
pub const GOLD: Argb = Argb::from_rgb(0xEC, 0xB1, 0x76);
pub const SANDY_BEIGE: Argb = Argb::from_rgb(0xFE, 0xD8, 0xB1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Email,
    Url,
    Text,
    Scanned,
    Sms,
    Twitter,
    Wifi,
    Generic,
}

impl CategoryKey {
    /// Keyed categories in filter-tab order.
    pub const FILTERABLE: [CategoryKey; 7] = [
        CategoryKey::Email,
        CategoryKey::Url,
        CategoryKey::Text,
        CategoryKey::Scanned,
        CategoryKey::Sms,
        CategoryKey::Twitter,
        CategoryKey::Wifi,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Url => "URL",
            Self::Text => "Text",
            Self::Scanned => "Scanned",
            Self::Sms => "SMS",
            Self::Twitter => "Twitter",
            Self::Wifi => "WiFi",
            Self::Generic => "QR",
        }
    }

    pub fn from_keyword(input: &str) -> Option<Self> {
        Self::FILTERABLE
            .into_iter()
            .find(|key| key.keyword().eq_ignore_ascii_case(input.trim()))
    }

    /// Case-insensitive substring test against this key's keyword.
    pub fn matches(&self, category: &str) -> bool {
        contains_ignore_case(category, self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    pub key: CategoryKey,
    pub icon: &'static str,
    pub accent: Argb,
}

/// Checked in order; the first keyword contained in the category wins.
pub static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        key: CategoryKey::Email,
        icon: "email",
        accent: GOLD,
    },
    ClassificationRule {
        key: CategoryKey::Url,
        icon: "link",
        accent: LIGHT_BROWN,
    },
    ClassificationRule {
        key: CategoryKey::Text,
        icon: "text_fields",
        accent: SANDY_BEIGE,
    },
    ClassificationRule {
        key: CategoryKey::Scanned,
        icon: "qr_code_scanner",
        accent: BROWN,
    },
    ClassificationRule {
        key: CategoryKey::Sms,
        icon: "sms",
        accent: SANDY_BEIGE,
    },
    ClassificationRule {
        key: CategoryKey::Twitter,
        icon: "tag",
        accent: LIGHT_BROWN,
    },
    ClassificationRule {
        key: CategoryKey::Wifi,
        icon: "wifi",
        accent: GOLD,
    },
];

pub static DEFAULT_RULE: ClassificationRule = ClassificationRule {
    key: CategoryKey::Generic,
    icon: "qr_code",
    accent: BROWN,
};

pub fn classify(category: &str) -> &'static ClassificationRule {
    RULES
        .iter()
        .find(|rule| rule.key.matches(category))
        .unwrap_or(&DEFAULT_RULE)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
