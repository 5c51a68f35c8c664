//! Filesystem image store.

use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Error type for image storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// File name carried no usable extension.
    #[error("invalid file name: {0}")]
    InvalidFileName(String),
}

/// Result type for image storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored image: the public path served to clients plus the on-disk path
/// used for the one-time marketplace upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Path clients fetch the image at.
    pub public_path: String,
    /// Absolute path of the file on disk.
    pub disk_path: PathBuf,
}

/// Filesystem-backed image store.
#[derive(Debug, Clone)]
pub struct ImageStore {
    upload_dir: PathBuf,
}

impl ImageStore {
    /// Creates a store rooted at the given upload directory.
    #[must_use]
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Returns the upload directory files are written under.
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Saves an uploaded image under a generated name, keeping the original
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidFileName` when the upload carries no
    /// extension and `StorageError::Io` when the write fails.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> StorageResult<StoredImage> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| StorageError::InvalidFileName(original_name.to_string()))?;

        let file_name = format!("{}.{extension}", Uuid::new_v4());
        let disk_path = self.upload_dir.join(&file_name);

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(&disk_path, bytes).await?;

        Ok(StoredImage {
            public_path: format!("image/{file_name}"),
            disk_path,
        })
    }

    /// Reads a stored image back for the marketplace upload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` when the file cannot be read.
    pub async fn read(&self, disk_path: &Path) -> StorageResult<Vec<u8>> {
        Ok(tokio::fs::read(disk_path).await?)
    }

    /// Removes a stored image after a successful marketplace publish.
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` for failures other than the file being
    /// absent.
    pub async fn remove(&self, disk_path: &Path) -> StorageResult<()> {
        match tokio::fs::remove_file(disk_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> ImageStore {
        let dir = std::env::temp_dir().join(format!("image-store-{}", Uuid::new_v4()));
        ImageStore::new(dir)
    }

    #[tokio::test]
    async fn save_keeps_extension_and_generates_name() {
        let store = temp_store();
        let stored = store.save("photo.jpg", b"fake-jpeg").await.unwrap();

        assert!(stored.public_path.starts_with("image/"));
        assert!(stored.public_path.ends_with(".jpg"));
        assert!(!stored.public_path.contains("photo"));
        assert_eq!(store.read(&stored.disk_path).await.unwrap(), b"fake-jpeg");
    }

    #[tokio::test]
    async fn save_rejects_missing_extension() {
        let store = temp_store();
        let err = store.save("photo", b"bytes").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidFileName(_)));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = temp_store();
        let stored = store.save("photo.png", b"bytes").await.unwrap();

        store.remove(&stored.disk_path).await.unwrap();
        store.remove(&stored.disk_path).await.unwrap();
        assert!(store.read(&stored.disk_path).await.is_err());
    }
}
