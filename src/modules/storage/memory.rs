use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::ImageStorage;
use crate::core::error::AppError;

/// A storage call observed by [`MemoryImageStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Put(String),
    Remove(String),
}

/// In-memory [`ImageStorage`] that records every call
#[derive(Debug, Default)]
pub struct MemoryImageStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    ops: Mutex<Vec<StorageOp>>,
    fail_writes: bool,
}

impl MemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail, as a full or read-only disk would
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Place a file without recording an operation
    pub fn seed(&self, file_name: &str, data: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(file_name.to_string(), data.to_vec());
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.files.lock().unwrap().contains_key(file_name)
    }

    pub fn read(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(file_name).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn ops(&self) -> Vec<StorageOp> {
        self.ops.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStorage for MemoryImageStorage {
    async fn put(&self, file_name: &str, data: Vec<u8>) -> Result<(), AppError> {
        self.ops
            .lock()
            .unwrap()
            .push(StorageOp::Put(file_name.to_string()));
        if self.fail_writes {
            return Err(AppError::Storage(format!(
                "Failed to write file '{}': no space left on device",
                file_name
            )));
        }
        self.files
            .lock()
            .unwrap()
            .insert(file_name.to_string(), data);
        Ok(())
    }

    async fn remove(&self, file_name: &str) -> Result<bool, AppError> {
        self.ops
            .lock()
            .unwrap()
            .push(StorageOp::Remove(file_name.to_string()));
        Ok(self.files.lock().unwrap().remove(file_name).is_some())
    }
}
