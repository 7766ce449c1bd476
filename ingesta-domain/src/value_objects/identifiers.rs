// Identifier value objects

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-request ingest identifier. Doubles as the batch id reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestId(pub Uuid);

impl IngestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IngestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl From<Uuid> for IngestId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}
