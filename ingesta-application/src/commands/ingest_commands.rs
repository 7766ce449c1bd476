use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{error, info, warn};

use ingesta_domain::{
    authenticate, build_raw_document, decode_body, normalize_payload, AuthDecision, IngestId,
    IngestReceipt, StorageError, StorageKey, ValidationSummary,
};

use crate::{AppError, AppState};

pub const STORED_MESSAGE: &str = "record batch stored in RAW zone";

/// Raw inputs of one ingestion request, as received by the transport.
#[derive(Debug, Clone, Copy)]
pub struct IngestRequest<'a> {
    pub api_key: Option<&'a str>,
    pub content_encoding: Option<&'a str>,
    pub body: &'a [u8],
}

/// Identifier and timestamp captured once when a request is received; the
/// same values feed the stored metadata and the storage key.
#[derive(Debug, Clone, Copy)]
pub struct IngestContext {
    pub ingest_id: IngestId,
    pub received_at: DateTime<Utc>,
}

impl IngestContext {
    pub fn capture() -> Self {
        Self {
            ingest_id: IngestId::new_v4(),
            received_at: Utc::now(),
        }
    }
}

pub async fn process_raw_ingest(
    state: &AppState,
    request: IngestRequest<'_>,
    context: IngestContext,
) -> Result<IngestReceipt, AppError> {
    state.metrics.record_request();
    let ingest_id = context.ingest_id;

    match authenticate(state.config.api_key.as_deref(), request.api_key) {
        AuthDecision::Authorized => {}
        AuthDecision::Unauthorized => {
            state.metrics.record_unauthorized();
            warn!(%ingest_id, "rejected ingest: missing or invalid x-api-key");
            return Err(AppError::Unauthorized);
        }
        AuthDecision::Unconfigured if state.config.require_api_key => {
            error!(%ingest_id, "api key required but none configured");
            return Err(AppError::Misconfigured(
                "api key authentication is required but no key is configured".to_string(),
            ));
        }
        AuthDecision::Unconfigured => {}
    }

    let Some(storage) = state.storage.as_ref() else {
        error!(%ingest_id, "storage credentials are not configured");
        return Err(AppError::Misconfigured(
            "storage credentials are not configured".to_string(),
        ));
    };

    let (normalized, report) = match parse_and_validate(state, &request) {
        Ok(parsed) => parsed,
        Err(err) => {
            state.metrics.record_rejected();
            warn!(%ingest_id, kind = err.kind().as_str(), "rejected ingest: {}", err);
            return Err(err);
        }
    };

    let records = normalized.batch.len();
    let shape = normalized.shape;
    let key = StorageKey::build(&state.config.base_path, context.received_at, &ingest_id);
    let document = build_raw_document(
        normalized.batch,
        ingest_id,
        context.received_at,
        &state.config.source_tag,
    );
    let bytes = document.to_json_bytes()?;

    let deadline = Duration::from_secs(state.config.storage_timeout_seconds);
    let written = match timeout(deadline, storage.write(&key, bytes, true)).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(state.config.storage_timeout_seconds)),
    };
    if let Err(err) = written {
        state.metrics.record_storage_error();
        error!(
            %ingest_id,
            path = %key,
            backend = %storage.describe(),
            "failed to write raw document: {}",
            err
        );
        return Err(AppError::StorageUnavailable(err));
    }

    state.metrics.record_ingest(records);
    info!(
        %ingest_id,
        path = %key,
        records,
        shape = shape.as_str(),
        validation = report.mode.as_str(),
        "raw document stored"
    );

    Ok(IngestReceipt {
        status: "ok",
        message: STORED_MESSAGE.to_string(),
        path: key,
        records,
        ingest_id,
        shape,
        validation: ValidationSummary {
            mode: report.mode,
            validated: report.validated,
        },
    })
}

fn parse_and_validate(
    state: &AppState,
    request: &IngestRequest<'_>,
) -> Result<(ingesta_domain::NormalizedPayload, ingesta_domain::ValidationReport), AppError> {
    let body = decode_body(
        request.content_encoding,
        request.body,
        state.config.max_body_bytes,
    )?;
    let normalized = normalize_payload(&body)?;
    let report = state.validator.validate(&normalized.batch)?;
    Ok((normalized, report))
}
