use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One attribution record describing where a displayed datum came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    pub id: String,
    pub source_name: String,
    pub source_url: String,
    pub fetched_at: String,
    pub license: String,
    #[serde(default)]
    pub terms: String,
    pub refresh_cadence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl ProvenanceEntry {
    /// Parses `fetched_at` as RFC 3339, or as a bare `YYYY-MM-DD` date at midnight UTC.
    pub fn fetched_at_parsed(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.fetched_at.trim();
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(stamp);
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc().fixed_offset())
    }

    pub fn fetched_at_display(&self) -> String {
        match self.fetched_at_parsed() {
            Some(stamp) => stamp.format("%Y-%m-%d %H:%M %:z").to_string(),
            None => self.fetched_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProvenanceResponse {
    #[serde(default)]
    pub(crate) items: Vec<ProvenanceEntry>,
}
