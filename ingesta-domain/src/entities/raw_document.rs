// RAW document entity
// The canonical persisted unit: ingestion metadata plus the untouched records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::entities::RecordBatch;
use crate::error::IngestError;
use crate::value_objects::IngestId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestMetadata {
    pub ingest_id: IngestId,
    #[serde(serialize_with = "serialize_utc_micros")]
    pub ingest_timestamp: DateTime<Utc>,
    pub source: String,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawDocument {
    pub metadata: IngestMetadata,
    pub data: RecordBatch,
}

impl RawDocument {
    /// UTF-8 JSON with non-ASCII text written literally.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, IngestError> {
        Ok(serde_json::to_vec(self)?)
    }
}

fn serialize_utc_micros<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
}
