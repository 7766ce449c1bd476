pub mod azure_blob;
pub mod local_fs;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use ingesta_domain::ports::RawStorageWriter;
use ingesta_domain::{StorageBackendKind, StorageSettings};

pub use azure_blob::AzureBlobWriter;
pub use local_fs::LocalFsWriter;

/// Builds the configured writer. Missing Azure credentials yield `None` so the
/// server still starts and reports the misconfiguration per request; present
/// but malformed credentials are a startup error.
pub fn build_storage_writer(
    settings: &StorageSettings,
) -> Result<Option<Arc<dyn RawStorageWriter>>> {
    let writer: Arc<dyn RawStorageWriter> = match settings.backend {
        StorageBackendKind::Azure => {
            if settings.account_name.is_none() || settings.account_key.is_none() {
                warn!(
                    account_name_set = settings.account_name.is_some(),
                    account_key_set = settings.account_key.is_some(),
                    "azure storage credentials missing, ingestion disabled"
                );
                return Ok(None);
            }
            Arc::new(AzureBlobWriter::new(settings)?)
        }
        StorageBackendKind::Local => Arc::new(LocalFsWriter::new(&settings.local_dir)),
    };
    info!(backend = %writer.describe(), "storage writer ready");
    Ok(Some(writer))
}
