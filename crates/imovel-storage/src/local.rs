use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{StorageError, StorageResult};

/// Local filesystem image store rooted at a single upload directory.
#[derive(Clone, Debug)]
pub struct ImageStore {
    base_path: PathBuf,
    base_url: String,
}

impl ImageStore {
    /// Create the store, creating the upload directory if needed.
    ///
    /// # Arguments
    /// * `base_path` - root directory for image storage (e.g. "uploads/images")
    /// * `base_url` - URL prefix for serving files (e.g. "/uploads/images")
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::CreateDirFailed(format!("{}: {}", base_path.display(), e))
        })?;

        Ok(ImageStore {
            base_path,
            base_url: base_url.into(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Public URL for a stored filename
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), filename)
    }

    /// Resolve a bare filename to a path inside the store.
    ///
    /// Filenames are checked for separators and traversal sequences, then the
    /// normalized parent is compared against the canonical base directory.
    /// Pattern checks happen upstream; this is the containment backstop.
    fn resolve(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(StorageError::InvalidPath(filename.to_string()));
        }

        let path = self.base_path.join(filename);

        let base_canonical = self
            .base_path
            .canonicalize()
            .map_err(|e| StorageError::CreateDirFailed(format!("canonicalize base: {e}")))?;
        let parent_canonical = path
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(filename.to_string()))?
            .canonicalize()
            .map_err(|_| StorageError::InvalidPath(filename.to_string()))?;

        if parent_canonical != base_canonical {
            return Err(StorageError::InvalidPath(filename.to_string()));
        }

        Ok(path)
    }

    /// Write a file into the store and return it wrapped in a [`StagedFile`]
    /// guard. The file is deleted again when the guard drops uncommitted.
    pub async fn persist(&self, filename: &str, data: &[u8]) -> StorageResult<StagedFile> {
        let path = self.resolve(filename)?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;
        file.write_all(data)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            "Staged file written"
        );

        Ok(StagedFile::new(path))
    }

    /// Delete a stored file. Missing files are reported as
    /// [`StorageError::NotFound`].
    pub async fn delete(&self, filename: &str) -> StorageResult<()> {
        let path = self.resolve(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted stored file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Best-effort delete: a missing file is fine (the derivative may never
    /// have been produced), any other failure is logged and swallowed.
    pub async fn delete_if_exists(&self, filename: &str) {
        match self.delete(filename).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(error) => {
                tracing::warn!(filename = %filename, error = %error, "Best-effort delete failed");
            }
        }
    }

}

/// Scoped-acquisition guard around a freshly written file.
///
/// Every file persisted during an upload request is wrapped in one of these;
/// unless the whole pipeline succeeds and [`commit`](Self::commit) is called,
/// dropping the guard removes the file. This is what makes batch uploads
/// all-or-nothing without any shared cleanup list.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn new(path: PathBuf) -> Self {
        StagedFile {
            path,
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file: disarm the guard.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed uncommitted staged file");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove uncommitted staged file"
                );
            }
        }
    }
}
