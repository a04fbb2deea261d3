use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryInput, CategoryResponseDto, ImageInput, ImageUpload, ValidCategory,
};
use crate::features::categories::models::{Category, CategoryData};
use crate::features::categories::repositories::CategoryRepository;
use crate::modules::imaging::{detect_format, ImageResizer, ResizeError};
use crate::modules::storage::ImageStorage;
use crate::shared::constants::{IMAGE_NOT_DECODABLE, NAME_NOT_UNIQUE};
use crate::shared::types::FieldErrors;

/// Service for category operations
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    storage: Arc<dyn ImageStorage>,
    resizer: Arc<dyn ImageResizer>,
    image_max_dimension: u32,
}

impl CategoryService {
    pub fn new(
        repository: Arc<dyn CategoryRepository>,
        storage: Arc<dyn ImageStorage>,
        resizer: Arc<dyn ImageResizer>,
        image_max_dimension: u32,
    ) -> Self {
        Self {
            repository,
            storage,
            resizer,
            image_max_dimension,
        }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repository.list().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get_by_id(&self, id: i64) -> Result<CategoryResponseDto> {
        self.find(id).await.map(CategoryResponseDto::from)
    }

    /// Create a category, storing an uploaded image under a generated name
    pub async fn create(&self, input: CategoryInput) -> Result<CategoryResponseDto> {
        let fields = self.validate(input, None).await?;

        let (image, written) = match fields.image {
            ImageInput::Filename(file_name) => (file_name, None),
            ImageInput::Upload(upload) => {
                let (file_name, resized) = self.prepare_upload(upload).await?;
                self.store_image(&file_name, resized).await?;
                (file_name.clone(), Some(file_name))
            }
        };

        let data = CategoryData {
            name: fields.name,
            description: fields.description,
            image: Some(image),
        };

        let category = match self.repository.insert(data).await {
            Ok(category) => category,
            Err(e) => {
                if let Some(file_name) = written {
                    self.remove_image(&file_name).await;
                }
                return Err(e);
            }
        };

        info!("Category created: id={}, name={}", category.id, category.name);
        Ok(category.into())
    }

    /// Overwrite every field of an existing category
    ///
    /// A newly uploaded image replaces the previous file. The upload is
    /// decoded and resized first, so a rejected image leaves the old file in
    /// place; the old file is then deleted before the new one is written.
    pub async fn update(&self, id: i64, input: CategoryInput) -> Result<CategoryResponseDto> {
        let existing = self.find(id).await?;
        let fields = self.validate(input, Some(id)).await?;

        let mut replaced = None;
        let (image, written) = match fields.image {
            ImageInput::Filename(file_name) => (file_name, None),
            ImageInput::Upload(upload) => {
                let (file_name, resized) = self.prepare_upload(upload).await?;
                if let Some(old) = existing.image.as_deref() {
                    self.remove_image(old).await;
                    replaced = Some(old);
                }
                self.store_image(&file_name, resized).await?;
                (file_name.clone(), Some(file_name))
            }
        };

        let data = CategoryData {
            name: fields.name,
            description: fields.description,
            image: Some(image),
        };

        let updated = match self.repository.update(id, data).await {
            Ok(Some(category)) => category,
            Ok(None) => {
                if let Some(file_name) = written {
                    self.remove_image(&file_name).await;
                }
                return Err(Self::not_found(id));
            }
            Err(e) => {
                if let Some(file_name) = written {
                    self.remove_image(&file_name).await;
                }
                if let Some(old) = replaced {
                    warn!(
                        "Category {} update failed after its image '{}' was removed",
                        id, old
                    );
                }
                return Err(e);
            }
        };

        info!("Category updated: id={}, name={}", updated.id, updated.name);
        Ok(updated.into())
    }

    /// Delete a category, then its image file
    pub async fn delete(&self, id: i64) -> Result<()> {
        let category = self.find(id).await?;

        if !self.repository.delete(id).await? {
            return Err(Self::not_found(id));
        }

        if let Some(image) = category.image.as_deref() {
            self.remove_image(image).await;
        }

        info!("Category deleted: id={}", id);
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<Category> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("Category {} not found", id))
    }

    /// Field rules first, then name uniqueness against every other category
    async fn validate(
        &self,
        input: CategoryInput,
        excluding_id: Option<i64>,
    ) -> Result<ValidCategory> {
        let fields = input.validate_fields()?;

        if self
            .repository
            .name_exists(&fields.name, excluding_id)
            .await?
        {
            debug!("Rejected duplicate category name: {}", fields.name);
            return Err(AppError::Validation(FieldErrors::single(
                "name",
                NAME_NOT_UNIQUE,
            )));
        }

        Ok(fields)
    }

    /// Resize an upload and pick its `<max>_<token>.<ext>` name
    ///
    /// Undecodable images are a validation error on `image`.
    async fn prepare_upload(&self, upload: ImageUpload) -> Result<(String, Vec<u8>)> {
        let file_name = self.generate_file_name(&upload);

        let resizer = Arc::clone(&self.resizer);
        let max_dimension = self.image_max_dimension;
        let data = upload.data;
        let resized = tokio::task::spawn_blocking(move || resizer.resize(&data, max_dimension))
            .await
            .map_err(|e| AppError::Internal(format!("Image resize task failed: {}", e)))?
            .map_err(|e| match e {
                ResizeError::UnknownFormat | ResizeError::Decode(_) => {
                    AppError::Validation(FieldErrors::single("image", IMAGE_NOT_DECODABLE))
                }
                ResizeError::Encode(_) => AppError::Image(e.to_string()),
            })?;

        debug!(
            "Prepared category image '{}' (uploaded as '{}')",
            file_name, upload.file_name
        );
        Ok((file_name, resized))
    }

    async fn store_image(&self, file_name: &str, data: Vec<u8>) -> Result<()> {
        self.storage.put(file_name, data).await?;
        debug!("Stored category image '{}'", file_name);
        Ok(())
    }

    fn generate_file_name(&self, upload: &ImageUpload) -> String {
        let extension = upload
            .extension()
            .map(str::to_string)
            .or_else(|| {
                detect_format(&upload.data)
                    .and_then(|f| f.extensions_str().first().map(|e| e.to_string()))
            })
            .unwrap_or_else(|| "img".to_string());

        format!(
            "{}_{}.{}",
            self.image_max_dimension,
            Uuid::new_v4().simple(),
            extension
        )
    }

    /// Best-effort removal of a replaced or orphaned image file
    async fn remove_image(&self, file_name: &str) {
        match self.storage.remove(file_name).await {
            Ok(true) => debug!("Removed category image '{}'", file_name),
            Ok(false) => debug!("Category image '{}' was already absent", file_name),
            Err(e) => warn!("Failed to remove category image '{}': {}", file_name, e),
        }
    }
}
