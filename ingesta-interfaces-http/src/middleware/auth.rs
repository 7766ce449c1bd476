use axum::http::header::CONTENT_ENCODING;
use axum::http::HeaderMap;

use ingesta_domain::{authenticate, AuthDecision, RuntimeConfig};

pub const API_KEY_HEADER: &str = "x-api-key";

pub fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER)?.to_str().ok()
}

pub fn content_encoding(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_ENCODING)?.to_str().ok()
}

/// Guard for the ops endpoints: open unless a key is configured.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    !matches!(
        authenticate(config.api_key.as_deref(), extract_api_key(headers)),
        AuthDecision::Unauthorized
    )
}
