use std::io::Read;

use flate2::read::GzDecoder;
use serde_json::Value;

use crate::entities::RecordBatch;
use crate::error::IngestError;
use crate::value_objects::InputShape;

/// Key under which the envelope shape carries its record array.
pub const ENVELOPE_KEY: &str = "body";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPayload {
    pub batch: RecordBatch,
    pub shape: InputShape,
}

/// Resolves a request body into an ordered batch.
///
/// Shapes are tried in a fixed order: a bare array, then an object whose
/// `body` is an array, then any other object as a batch of one. An object
/// whose `body` is present but not an array, and any top-level scalar, are
/// rejected. Record values are never touched.
pub fn normalize_payload(body: &[u8]) -> Result<NormalizedPayload, IngestError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| IngestError::MalformedJson(err.to_string()))?;

    let (records, shape) = match value {
        Value::Array(items) => (items, InputShape::Array),
        Value::Object(mut map) => match map.remove(ENVELOPE_KEY) {
            Some(Value::Array(items)) => (items, InputShape::Envelope),
            Some(other) => {
                return Err(IngestError::UnsupportedShape(format!(
                    "'{}' must be an array, got {}",
                    ENVELOPE_KEY,
                    json_type_name(&other)
                )));
            }
            None => (vec![Value::Object(map)], InputShape::Single),
        },
        other => {
            return Err(IngestError::UnsupportedShape(format!(
                "expected an object or an array, got {}",
                json_type_name(&other)
            )));
        }
    };

    let batch = RecordBatch::new(records).ok_or(IngestError::EmptyBatch)?;
    Ok(NormalizedPayload { batch, shape })
}

/// Inflates a gzip body when the client declared `Content-Encoding: gzip`.
/// The inflated size is capped at `max_len` bytes.
pub fn decode_body(
    content_encoding: Option<&str>,
    body: &[u8],
    max_len: u64,
) -> Result<Vec<u8>, IngestError> {
    let is_gzip = content_encoding
        .map(|value| value.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false);
    if !is_gzip {
        return Ok(body.to_vec());
    }
    let mut decoder = GzDecoder::new(body).take(max_len.saturating_add(1));
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|err| IngestError::MalformedJson(format!("invalid gzip body: {}", err)))?;
    if out.len() as u64 > max_len {
        return Err(IngestError::PayloadTooLarge { limit: max_len });
    }
    Ok(out)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
