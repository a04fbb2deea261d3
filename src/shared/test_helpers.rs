use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use crate::features::categories::repositories::memory::MemoryCategoryRepository;
use crate::features::categories::repositories::CategoryRepository;
use crate::features::categories::{routes, CategoryService};
use crate::modules::imaging::ThumbnailResizer;
use crate::modules::storage::memory::MemoryImageStorage;
use crate::modules::storage::ImageStorage;
use crate::shared::constants::{DEFAULT_IMAGE_MAX_DIMENSION, DEFAULT_MAX_UPLOAD_SIZE};

/// Category service wired to in-memory persistence and storage
pub struct TestContext {
    pub repository: Arc<MemoryCategoryRepository>,
    pub storage: Arc<MemoryImageStorage>,
    pub service: Arc<CategoryService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_storage(MemoryImageStorage::new())
    }

    pub fn with_storage(storage: MemoryImageStorage) -> Self {
        let repository = Arc::new(MemoryCategoryRepository::new());
        let storage = Arc::new(storage);
        let dyn_repository: Arc<dyn CategoryRepository> = repository.clone();
        let dyn_storage: Arc<dyn ImageStorage> = storage.clone();

        let service = Arc::new(CategoryService::new(
            dyn_repository,
            dyn_storage,
            Arc::new(ThumbnailResizer),
            DEFAULT_IMAGE_MAX_DIMENSION,
        ));

        Self {
            repository,
            storage,
            service,
        }
    }

    pub fn router(&self) -> Router {
        routes(Arc::clone(&self.service), DEFAULT_MAX_UPLOAD_SIZE)
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Could not create test server.")
    }
}
