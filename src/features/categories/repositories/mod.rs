use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryData};

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgCategoryRepository;

/// Persistence for categories.
///
/// Implementations enforce name uniqueness themselves and report a clash as
/// the same `name` validation error the service produces.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, ordered by id
    async fn list(&self) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Whether another category already uses `name` (exact, case-sensitive)
    async fn name_exists(&self, name: &str, excluding_id: Option<i64>) -> Result<bool>;

    async fn insert(&self, data: CategoryData) -> Result<Category>;

    /// Overwrite all columns; returns `None` when the id does not exist
    async fn update(&self, id: i64, data: CategoryData) -> Result<Option<Category>>;

    /// Returns `true` if the row existed and was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}
