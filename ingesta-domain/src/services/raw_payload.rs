use chrono::{DateTime, Utc};

use crate::entities::{IngestMetadata, RawDocument, RecordBatch};
use crate::value_objects::IngestId;

pub fn build_raw_document(
    batch: RecordBatch,
    ingest_id: IngestId,
    ingest_timestamp: DateTime<Utc>,
    source: &str,
) -> RawDocument {
    RawDocument {
        metadata: IngestMetadata {
            ingest_id,
            ingest_timestamp,
            source: source.to_string(),
            record_count: batch.len(),
        },
        data: batch,
    }
}
