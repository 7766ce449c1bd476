// Domain error taxonomy for the RAW ingestion pipeline

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedJson,
    UnsupportedShape,
    EmptyBatch,
    PayloadTooLarge,
    NotAnObject,
    MissingFields,
    Unauthorized,
    MisconfiguredServer,
    StorageUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedJson => "malformed_json",
            ErrorKind::UnsupportedShape => "unsupported_shape",
            ErrorKind::EmptyBatch => "empty_batch",
            ErrorKind::PayloadTooLarge => "payload_too_large",
            ErrorKind::NotAnObject => "not_an_object",
            ErrorKind::MissingFields => "missing_fields",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::MisconfiguredServer => "misconfigured_server",
            ErrorKind::StorageUnavailable => "storage_unavailable",
        }
    }
}

/// A single per-record violation found by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub index: usize,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl Violation {
    pub fn not_an_object(index: usize) -> Self {
        Self {
            index,
            kind: ErrorKind::NotAnObject,
            missing: Vec::new(),
        }
    }

    pub fn missing_fields(index: usize, missing: Vec<String>) -> Self {
        Self {
            index,
            kind: ErrorKind::MissingFields,
            missing,
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("body must be valid JSON: {0}")]
    MalformedJson(String),
    #[error("unsupported payload shape: {0}")]
    UnsupportedShape(String),
    #[error("batch must contain at least one record")]
    EmptyBatch,
    #[error("decoded body exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },
    #[error("{} record(s) failed validation", violations.len())]
    InvalidRecords {
        violations: Vec<Violation>,
        truncated: bool,
    },
    #[error("failed to serialize raw document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IngestError {
    /// Kind reported to the caller. A rejected batch is reported with the
    /// kind of its first violation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::MalformedJson(_) => ErrorKind::MalformedJson,
            IngestError::UnsupportedShape(_) => ErrorKind::UnsupportedShape,
            IngestError::EmptyBatch => ErrorKind::EmptyBatch,
            IngestError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            IngestError::InvalidRecords { violations, .. } => violations
                .first()
                .map(|violation| violation.kind)
                .unwrap_or(ErrorKind::MissingFields),
            IngestError::Serialization(_) => ErrorKind::MisconfiguredServer,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object already exists: {0}")]
    Conflict(String),
    #[error("storage transport error: {0}")]
    Transport(String),
    #[error("storage backend returned status {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("storage request timed out after {0}s")]
    Timeout(u64),
    #[error("storage io error: {0}")]
    Io(String),
}
