use ingesta_domain::{ErrorKind, IngestError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Rejected(IngestError),
    #[error("server misconfigured: {0}")]
    Misconfigured(String),
    #[error("storage unavailable")]
    StorageUnavailable(#[source] StorageError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized => ErrorKind::Unauthorized,
            AppError::Rejected(err) => err.kind(),
            AppError::Misconfigured(_) | AppError::Internal(_) => ErrorKind::MisconfiguredServer,
            AppError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        match value {
            IngestError::Serialization(err) => AppError::Internal(err.into()),
            other => AppError::Rejected(other),
        }
    }
}
