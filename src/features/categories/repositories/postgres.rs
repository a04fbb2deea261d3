//! Postgres-backed category repository
//!
//! Queries go through `sqlx::query_as` and are checked at runtime, so the
//! crate builds without a live database or `.sqlx` offline query data. The
//! in-memory repository in `memory` covers the same contract in tests.

use async_trait::async_trait;
use sqlx::PgPool;

use super::CategoryRepository;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryData};
use crate::shared::constants::NAME_NOT_UNIQUE;
use crate::shared::types::FieldErrors;

const NAME_UNIQUE_CONSTRAINT: &str = "categories_name_unique";

/// Convert database error to more specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505"))
            && db_err.constraint() == Some(NAME_UNIQUE_CONSTRAINT)
        {
            return AppError::Validation(FieldErrors::single("name", NAME_NOT_UNIQUE));
        }
    }

    tracing::error!("Category query failed: {:?}", e);
    AppError::Database(e)
}

/// [`CategoryRepository`] on the `categories` table
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, image, created_at, updated_at
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, image, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    async fn name_exists(&self, name: &str, excluding_id: Option<i64>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM categories
                WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(excluding_id)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    async fn insert(&self, data: CategoryData) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, image)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, image, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.image)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    async fn update(&self, id: i64, data: CategoryData) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1,
                description = $2,
                image = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, description, image, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
