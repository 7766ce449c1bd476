// Record entities
// Business records submitted by callers, kept as untyped JSON

use serde::Serialize;
use serde_json::Value;

/// Field names every record must carry, regardless of value type.
pub const REQUIRED_FIELDS: [&str; 3] = ["nit", "empresa", "ciiu"];

/// Ordered, non-empty sequence of incoming records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordBatch(Vec<Value>);

impl RecordBatch {
    /// Returns `None` for an empty sequence.
    pub fn new(records: Vec<Value>) -> Option<Self> {
        if records.is_empty() {
            None
        } else {
            Some(Self(records))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> &[Value] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}
