use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for category
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values written on insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryData {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}
