use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::ImageStorage;
use crate::core::error::AppError;
use crate::shared::validation::is_safe_file_name;

/// Image storage backed by a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the upload directory exists, create it if not
    pub async fn ensure_root_exists(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory '{}': {}",
                self.root.display(),
                e
            ))
        })?;

        info!("Upload directory ready: {}", self.root.display());
        Ok(())
    }

    /// Resolve a file name to a path inside the upload directory
    ///
    /// Names that could escape the directory are refused.
    fn path_for(&self, file_name: &str) -> Result<PathBuf, AppError> {
        if !is_safe_file_name(file_name) {
            return Err(AppError::Storage(format!(
                "Refusing unsafe file name '{}'",
                file_name
            )));
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    /// Write a file into the upload directory
    ///
    /// # Arguments
    /// * `file_name` - Name of the file inside the upload directory
    /// * `data` - The file content as bytes
    async fn put(&self, file_name: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.path_for(file_name)?;
        let size = data.len();

        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file '{}': {}", path.display(), e))
        })?;

        debug!("Stored file '{}' ({} bytes)", path.display(), size);
        Ok(())
    }

    /// Delete a file from the upload directory
    ///
    /// # Arguments
    /// * `file_name` - Name of the file inside the upload directory
    ///
    /// # Returns
    /// `true` if a file was deleted, `false` if it did not exist
    async fn remove(&self, file_name: &str) -> Result<bool, AppError> {
        // Stored names may be client-supplied; anything that is not a plain
        // file name cannot live in the upload directory.
        if !is_safe_file_name(file_name) {
            warn!("Skipping removal of '{}': not an upload file name", file_name);
            return Ok(false);
        }
        let path = self.path_for(file_name)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted file '{}'", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File '{}' already absent", path.display());
                Ok(false)
            }
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete file '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}
