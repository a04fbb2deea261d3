use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppPath, CategoryPayload};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::services::CategoryService;

/// List all categories
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    let categories = service.list().await?;
    Ok(Json(categories))
}

/// Get category by id
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CategoryResponseDto>> {
    let category = service.get_by_id(id).await?;
    Ok(Json(category))
}

/// Create a category
///
/// Accepts multipart/form-data with:
/// - `name`: unique, at most 255 characters (required)
/// - `description`: free text (required)
/// - `image`: an image file to resize and store, or an existing file name (required)
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    CategoryPayload(input): CategoryPayload,
) -> Result<(StatusCode, Json<CategoryResponseDto>)> {
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace every field of a category
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<i64>,
    CategoryPayload(input): CategoryPayload,
) -> Result<Json<CategoryResponseDto>> {
    let category = service.update(id, input).await?;
    Ok(Json(category))
}

/// Delete a category and its image
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
