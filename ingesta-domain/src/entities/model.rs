use serde::{Deserialize, Serialize};

use crate::value_objects::{IngestId, InputShape, StorageKey, ValidationMode};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_key: Option<String>,
    pub require_api_key: bool,
    pub base_path: String,
    pub source_tag: String,
    pub validation_sample_limit: Option<usize>,
    pub max_violations: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    /// Upper bound for one storage write; kept below the HTTP timeout.
    pub storage_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7071".to_string(),
            api_key: None,
            require_api_key: false,
            base_path: "ingesta_ccma".to_string(),
            source_tag: "api-ingesta-ccma".to_string(),
            validation_sample_limit: None,
            max_violations: 50,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 30,
            storage_timeout_seconds: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    Azure,
    Local,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackendKind,
    pub account_name: Option<String>,
    pub account_key: Option<String>,
    pub endpoint: Option<String>,
    pub container_name: String,
    pub local_dir: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub mode: ValidationMode,
    pub validated: usize,
}

/// Success payload returned to the caller once the RAW document is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    pub status: &'static str,
    pub message: String,
    pub path: StorageKey,
    pub records: usize,
    pub ingest_id: IngestId,
    pub shape: InputShape,
    pub validation: ValidationSummary,
}
