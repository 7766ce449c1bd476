use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use ingesta_domain::ports::RawStorageWriter;
use ingesta_domain::{StorageError, StorageKey};

/// Mirrors the RAW container layout under a local directory.
pub struct LocalFsWriter {
    root: PathBuf,
}

impl LocalFsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &StorageKey) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key.as_str());
        let escapes_root = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if escapes_root {
            return Err(StorageError::Io(format!("refusing unsafe key '{}'", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl RawStorageWriter for LocalFsWriter {
    async fn write(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| StorageError::Io(err.to_string()))?;
            }
        }
        if !overwrite && fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::Conflict(key.to_string()));
        }

        // Write next to the target then rename, so readers never observe a
        // partially written document.
        let temp_path = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        if let Err(err) = fs::write(&temp_path, &bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(err.to_string()));
        }
        if let Err(err) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(err.to_string()));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file://{}", self.root.display())
    }
}
