use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::category::Category;

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            title: category.title,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
