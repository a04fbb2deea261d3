use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::CategoryRepository;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryData};
use crate::shared::constants::NAME_NOT_UNIQUE;
use crate::shared::types::FieldErrors;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    rows: BTreeMap<i64, Category>,
}

impl MemoryState {
    fn name_taken(&self, name: &str, excluding_id: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|c| c.name == name && Some(c.id) != excluding_id)
    }
}

/// In-memory [`CategoryRepository`] mirroring the table's unique name constraint
#[derive(Debug, Default)]
pub struct MemoryCategoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.rows.len()
    }
}

fn unique_violation() -> AppError {
    AppError::Validation(FieldErrors::single("name", NAME_NOT_UNIQUE))
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn name_exists(&self, name: &str, excluding_id: Option<i64>) -> Result<bool> {
        Ok(self.state.read().await.name_taken(name, excluding_id))
    }

    async fn insert(&self, data: CategoryData) -> Result<Category> {
        let mut state = self.state.write().await;
        if state.name_taken(&data.name, None) {
            return Err(unique_violation());
        }

        state.last_id += 1;
        let now = Utc::now();
        let category = Category {
            id: state.last_id,
            name: data.name,
            description: data.description,
            image: data.image,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: i64, data: CategoryData) -> Result<Option<Category>> {
        let mut state = self.state.write().await;
        if !state.rows.contains_key(&id) {
            return Ok(None);
        }
        if state.name_taken(&data.name, Some(id)) {
            return Err(unique_violation());
        }

        let Some(category) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        category.name = data.name;
        category.description = data.description;
        category.image = data.image;
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.state.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str) -> CategoryData {
        CategoryData {
            name: name.to_string(),
            description: "desc".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = MemoryCategoryRepository::new();
        let first = repo.insert(data("a")).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo.insert(data("b")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_unique_constraint_is_enforced_on_insert_and_update() {
        let repo = MemoryCategoryRepository::new();
        repo.insert(data("a")).await.unwrap();
        let b = repo.insert(data("b")).await.unwrap();

        assert!(matches!(
            repo.insert(data("a")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            repo.update(b.id, data("a")).await,
            Err(AppError::Validation(_))
        ));
        assert!(repo.update(b.id, data("b")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_name_match_is_case_sensitive() {
        let repo = MemoryCategoryRepository::new();
        let books = repo.insert(data("Books")).await.unwrap();

        assert!(repo.name_exists("Books", None).await.unwrap());
        assert!(!repo.name_exists("books", None).await.unwrap());
        assert!(!repo.name_exists("Books", Some(books.id)).await.unwrap());
    }
}
