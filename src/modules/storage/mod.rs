//! Storage module for category images
//!
//! Images live flat in a single uploads directory and are addressed by
//! file name only. [`LocalImageStorage`] is the filesystem implementation.

use async_trait::async_trait;

use crate::core::error::AppError;

mod local_storage;
#[cfg(test)]
pub mod memory;

pub use local_storage::LocalImageStorage;

/// Flat, name-addressed storage for image files
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Write `data` under `file_name`, replacing any existing file
    async fn put(&self, file_name: &str, data: Vec<u8>) -> Result<(), AppError>;

    /// Remove `file_name`.
    ///
    /// A file that is already absent is not an error; returns whether a file
    /// was actually removed.
    async fn remove(&self, file_name: &str) -> Result<bool, AppError>;
}
