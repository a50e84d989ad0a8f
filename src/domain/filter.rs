use chrono::NaiveDate;

use super::classify::CategoryKey;
use super::record::HistoryRecord;

/// Type tab selection for the history list. `None` shows every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeFilter(pub Option<CategoryKey>);

impl TypeFilter {
    pub const ALL: TypeFilter = TypeFilter(None);

    pub fn label(&self) -> &'static str {
        match self.0 {
            None => "All",
            Some(key) => key.keyword(),
        }
    }

    pub fn tabs() -> impl Iterator<Item = TypeFilter> {
        std::iter::once(TypeFilter::ALL)
            .chain(CategoryKey::FILTERABLE.into_iter().map(|k| TypeFilter(Some(k))))
    }

    pub fn next(self) -> Self {
        let tabs: Vec<_> = Self::tabs().collect();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    pub fn prev(self) -> Self {
        let tabs: Vec<_> = Self::tabs().collect();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + tabs.len() - 1) % tabs.len()]
    }

    pub fn matches(&self, record: &HistoryRecord) -> bool {
        match self.0 {
            None => true,
            Some(key) => key.matches(record.category()),
        }
    }
}

/// Records passing the type filter whose payload or category contains `query`
/// (case-insensitive). Order is preserved.
pub fn filter_records<'a>(
    records: &'a [HistoryRecord],
    filter: TypeFilter,
    query: &str,
) -> Vec<&'a HistoryRecord> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| filter.matches(r))
        .filter(|r| {
            query.is_empty()
                || r.payload().to_lowercase().contains(&query)
                || r.category().to_lowercase().contains(&query)
        })
        .collect()
}

/// Groups by `YYYY-MM-DD`, newest date first; order inside a group is kept.
pub fn group_by_date<'a>(records: &[&'a HistoryRecord]) -> Vec<(String, Vec<&'a HistoryRecord>)> {
    let mut groups: Vec<(String, Vec<&'a HistoryRecord>)> = Vec::new();
    for &record in records {
        match groups.iter_mut().find(|(date, _)| date == record.date()) {
            Some((_, items)) => items.push(record),
            None => groups.push((record.date().to_string(), vec![record])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

/// Heading for a `YYYY-MM-DD` group relative to `today`.
pub fn date_label(date: &str, today: NaiveDate) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) if day == today => "Today".to_string(),
        Ok(day) if today.pred_opt() == Some(day) => "Yesterday".to_string(),
        Ok(day) => day.format("%a %d %b %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Argb;

    fn record(category: &str, payload: &str, created_at: &str) -> HistoryRecord {
        HistoryRecord::from_parts(
            uuid::Uuid::new_v4().to_string(),
            category,
            payload,
            created_at,
            Argb::BLACK,
            Argb::WHITE,
        )
    }

    #[test]
    fn tabs_cycle() {
        assert_eq!(TypeFilter::tabs().count(), 8);
        assert_eq!(TypeFilter::ALL.next(), TypeFilter(Some(CategoryKey::Email)));
        assert_eq!(TypeFilter::ALL.prev(), TypeFilter(Some(CategoryKey::Wifi)));
        assert_eq!(TypeFilter(Some(CategoryKey::Wifi)).next(), TypeFilter::ALL);
        assert_eq!(TypeFilter::ALL.label(), "All");
    }

    #[test]
    fn filter_by_type_and_query() {
        let records = vec![
            record("URL QR", "https://example.com", "2024-05-02 10:00"),
            record("Text QR", "hello world", "2024-05-02 09:00"),
            record("Scanned", "https://rust-lang.org", "2024-05-01 08:00"),
        ];

        let urls = filter_records(&records, TypeFilter(Some(CategoryKey::Url)), "");
        assert_eq!(urls.len(), 1);

        let https = filter_records(&records, TypeFilter::ALL, "HTTPS");
        assert_eq!(https.len(), 2);
        assert_eq!(https[0].category(), "URL QR");

        let by_category = filter_records(&records, TypeFilter::ALL, "scan");
        assert_eq!(by_category.len(), 1);

        assert!(filter_records(&records, TypeFilter(Some(CategoryKey::Wifi)), "").is_empty());
    }

    #[test]
    fn groups_newest_date_first() {
        let records = vec![
            record("Text QR", "b", "2024-05-01 10:00"),
            record("Text QR", "c", "2024-05-02 10:00"),
            record("Text QR", "a", "2024-05-01 09:00"),
        ];
        let refs: Vec<&HistoryRecord> = records.iter().collect();
        let groups = group_by_date(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "2024-05-02");
        assert_eq!(groups[1].0, "2024-05-01");
        assert_eq!(groups[1].1[0].payload(), "b");
        assert_eq!(groups[1].1[1].payload(), "a");
    }

    #[test]
    fn date_labels() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).expect("date");
        assert_eq!(date_label("2024-05-02", today), "Today");
        assert_eq!(date_label("2024-05-01", today), "Yesterday");
        assert_eq!(date_label("2024-04-30", today), "Tue 30 Apr 2024");
        assert_eq!(date_label("garbage", today), "garbage");
    }
}
