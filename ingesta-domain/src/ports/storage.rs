use async_trait::async_trait;

use crate::error::StorageError;
use crate::value_objects::StorageKey;

/// Narrow write port over the RAW zone object store.
///
/// A single call is one all-or-nothing object PUT. Implementations must not
/// retry and must not put credentials into error messages.
#[async_trait]
pub trait RawStorageWriter: Send + Sync {
    async fn write(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        overwrite: bool,
    ) -> Result<(), StorageError>;

    /// Backend description for logs, e.g. `azure://account/raw`.
    fn describe(&self) -> String;
}
