use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::domain::HistoryRecord;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ExportEntry<'a> {
    id: &'a str,
    category: &'a str,
    payload: &'a str,
    created_at: &'a str,
    foreground: String,
    background: String,
}

impl<'a> From<&'a HistoryRecord> for ExportEntry<'a> {
    fn from(record: &'a HistoryRecord) -> Self {
        Self {
            id: record.id(),
            category: record.category(),
            payload: record.payload(),
            created_at: record.created_at(),
            foreground: record.foreground_color().to_string(),
            background: record.background_color().to_string(),
        }
    }
}

pub fn to_json(records: &[HistoryRecord]) -> Result<String, ExportError> {
    let entries: Vec<ExportEntry> = records.iter().map(ExportEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Writes `records` as a JSON array, replacing `path`. Returns the entry count.
pub fn write_json(path: &Path, records: &[HistoryRecord]) -> Result<usize, ExportError> {
    let json = to_json(records)?;
    std::fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("exported {} history items to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Argb;

    #[test]
    fn colors_export_as_hex() {
        let record = HistoryRecord::from_parts(
            "a",
            "URL QR",
            "https://example.com",
            "2024-05-02 10:00",
            Argb(0xFF6F_4E37),
            Argb::WHITE,
        );

        let value: serde_json::Value =
            serde_json::from_str(&to_json(&[record]).expect("encode")).expect("valid json");
        assert_eq!(value[0]["category"], "URL QR");
        assert_eq!(value[0]["foreground"], "#6F4E37");
        assert_eq!(value[0]["background"], "#FFFFFF");
        assert_eq!(value[0]["created_at"], "2024-05-02 10:00");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("history.json");
        let records = vec![HistoryRecord::with_id("a", "Text QR", "hi", Argb::BLACK, Argb::WHITE)];

        assert_eq!(write_json(&path, &records).expect("export"), 1);
        let written = std::fs::read_to_string(&path).expect("read");
        assert!(written.contains("\"payload\": \"hi\""));

        let missing = dir.path().join("no-such-dir").join("out.json");
        assert!(matches!(
            write_json(&missing, &records),
            Err(ExportError::Write { .. })
        ));
    }
}
