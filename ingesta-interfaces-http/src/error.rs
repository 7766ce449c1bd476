use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ingesta_application::AppError;
use ingesta_domain::{ErrorKind, IngestError, Violation};

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest {
        kind: ErrorKind,
        message: String,
        violations: Vec<Violation>,
        truncated: bool,
    },
    Internal {
        kind: ErrorKind,
        message: String,
    },
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        let kind = value.kind();
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::Rejected(IngestError::InvalidRecords {
                violations,
                truncated,
            }) => HttpError::BadRequest {
                kind,
                message: format!("{} record(s) failed validation", violations.len()),
                violations,
                truncated,
            },
            AppError::Rejected(err) => HttpError::BadRequest {
                kind,
                message: err.to_string(),
                violations: Vec::new(),
                truncated: false,
            },
            // Details stay in the server log; callers only see the category.
            AppError::Misconfigured(_) | AppError::Internal(_) => HttpError::Internal {
                kind: ErrorKind::MisconfiguredServer,
                message: "server configuration is incomplete".to_string(),
            },
            AppError::StorageUnavailable(_) => HttpError::Internal {
                kind,
                message: "error writing to storage".to_string(),
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    kind: ErrorKind,
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<Violation>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    truncated: bool,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    status: "error",
                    kind: ErrorKind::Unauthorized,
                    error: "unauthorized".to_string(),
                    violations: Vec::new(),
                    truncated: false,
                },
            ),
            HttpError::BadRequest {
                kind,
                message,
                violations,
                truncated,
            } => (
                if kind == ErrorKind::PayloadTooLarge {
                    StatusCode::PAYLOAD_TOO_LARGE
                } else {
                    StatusCode::BAD_REQUEST
                },
                ErrorBody {
                    status: "error",
                    kind,
                    error: message,
                    violations,
                    truncated,
                },
            ),
            HttpError::Internal { kind, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    status: "error",
                    kind,
                    error: message,
                    violations: Vec::new(),
                    truncated: false,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
