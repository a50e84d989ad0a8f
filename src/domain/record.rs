use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color::{Argb, RenderColors};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Label used when a record would otherwise be created with a blank category.
pub const FALLBACK_CATEGORY: &str = "QR";

/// One generated or scanned code. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    id: String,
    category: String,
    payload: String,
    created_at: String,
    foreground_color: Argb,
    background_color: Argb,
}

impl HistoryRecord {
    /// New record with a fresh id, stamped with the current local minute.
    pub fn new(
        category: &str,
        payload: impl Into<String>,
        foreground_color: Argb,
        background_color: Argb,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4().to_string(),
            category,
            payload,
            foreground_color,
            background_color,
        )
    }

    pub fn with_id(
        id: impl Into<String>,
        category: &str,
        payload: impl Into<String>,
        foreground_color: Argb,
        background_color: Argb,
    ) -> Self {
        let category = category.trim();
        Self {
            id: id.into(),
            category: if category.is_empty() {
                FALLBACK_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            payload: payload.into(),
            created_at: format_timestamp(&Local::now()),
            foreground_color,
            background_color,
        }
    }

    /// Rebuilds a record exactly as stored, timestamp included.
    pub fn from_parts(
        id: impl Into<String>,
        category: impl Into<String>,
        payload: impl Into<String>,
        created_at: impl Into<String>,
        foreground_color: Argb,
        background_color: Argb,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            payload: payload.into(),
            created_at: created_at.into(),
            foreground_color,
            background_color,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Local time as `YYYY-MM-DD HH:MM`.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn foreground_color(&self) -> Argb {
        self.foreground_color
    }

    pub fn background_color(&self) -> Argb {
        self.background_color
    }

    pub fn colors(&self) -> RenderColors {
        RenderColors {
            foreground: self.foreground_color,
            background: self.background_color,
        }
    }

    /// The `YYYY-MM-DD` part of `created_at`.
    pub fn date(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }

    /// The `HH:MM` part of `created_at`, empty when absent.
    pub fn time(&self) -> &str {
        self.created_at.get(11..).unwrap_or("")
    }
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn new_record_has_unique_id_and_minute_timestamp() {
        let a = HistoryRecord::new("Text QR", "hello", Argb::BLACK, Argb::WHITE);
        let b = HistoryRecord::new("Text QR", "hello", Argb::BLACK, Argb::WHITE);
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at.len(), 16);
        NaiveDateTime::parse_from_str(&a.created_at, TIMESTAMP_FORMAT).expect("timestamp format");
        assert_eq!(a.date().len(), 10);
        assert_eq!(a.time().len(), 5);
    }

    #[test]
    fn blank_category_falls_back() {
        let record = HistoryRecord::new("   ", "x", Argb::BLACK, Argb::WHITE);
        assert_eq!(record.category(), FALLBACK_CATEGORY);

        let record = HistoryRecord::new(" URL QR ", "x", Argb::BLACK, Argb::WHITE);
        assert_eq!(record.category(), "URL QR");
    }

    #[test]
    fn from_parts_keeps_stored_values() {
        let record = HistoryRecord::from_parts(
            "legacy",
            "",
            "hello",
            "2024-05-02 10:00",
            Argb(0xFF6F_4E37),
            Argb::WHITE,
        );
        assert_eq!(record.id(), "legacy");
        assert_eq!(record.category(), "");
        assert_eq!(record.date(), "2024-05-02");
        assert_eq!(record.time(), "10:00");
        assert_eq!(record.colors().foreground, Argb(0xFF6F_4E37));
    }
}
