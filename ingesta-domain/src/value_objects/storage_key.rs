// Partitioned storage key for RAW documents

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::IngestId;

/// Object key of the form
/// `<base>/year=YYYY/month=MM/day=DD/ingest_YYYYMMDD_HHMMSS_<ingest_id>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn build(base_path: &str, timestamp: DateTime<Utc>, ingest_id: &IngestId) -> Self {
        let filename = format!(
            "ingest_{}_{}.json",
            timestamp.format("%Y%m%d_%H%M%S"),
            ingest_id
        );
        let partition = format!(
            "year={}/month={}/day={}",
            timestamp.format("%Y"),
            timestamp.format("%m"),
            timestamp.format("%d")
        );
        let base = base_path.trim().trim_matches('/');
        if base.is_empty() {
            Self(format!("{}/{}", partition, filename))
        } else {
            Self(format!("{}/{}/{}", base, partition, filename))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn fixed_id() -> IngestId {
        IngestId(Uuid::parse_str("0f8fad5b-d9cb-469f-a165-70867728950e").expect("uuid"))
    }

    #[test]
    fn partitions_match_utc_calendar_date_zero_padded() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 7, 4, 5, 9).unwrap();
        let key = StorageKey::build("ingesta_ccma", instant, &fixed_id());
        assert_eq!(
            key.as_str(),
            "ingesta_ccma/year=2024/month=03/day=07/ingest_20240307_040509_0f8fad5b-d9cb-469f-a165-70867728950e.json"
        );
    }

    #[test]
    fn partition_follows_utc_not_local_offset() {
        let local = chrono::FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 12, 31, 22, 30, 0)
            .unwrap();
        let key = StorageKey::build("raw", local.with_timezone(&Utc), &fixed_id());
        assert!(key.as_str().starts_with("raw/year=2024/month=01/day=01/ingest_20240101_033000_"));
    }

    #[test]
    fn base_path_slashes_are_trimmed_and_empty_base_is_allowed() {
        let instant = Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap();
        let trimmed = StorageKey::build("/ingesta_ccma/", instant, &fixed_id());
        assert!(trimmed.as_str().starts_with("ingesta_ccma/year=2025/"));
        let bare = StorageKey::build("", instant, &fixed_id());
        assert!(bare.as_str().starts_with("year=2025/month=11/day=20/"));
    }

    #[test]
    fn same_second_requests_get_distinct_keys() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let first = StorageKey::build("ingesta_ccma", instant, &IngestId::new_v4());
        let second = StorageKey::build("ingesta_ccma", instant, &IngestId::new_v4());
        assert_ne!(first, second);
    }
}
