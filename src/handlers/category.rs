use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;

use crate::dtos::category::{CategoryFilter, CategoryResponse, CreateCategoryRequest};
use crate::error::AppError;
use crate::handlers::map_unique_violation;
use crate::models::category::Category;
use crate::state::AppState;

// GET /categories - list, ordered by title
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = match filter.search {
        Some(search) if !search.trim().is_empty() => {
            sqlx::query_as::<_, Category>(
                "SELECT id, title, created_at, updated_at FROM categories
                 WHERE title ILIKE $1 ORDER BY title",
            )
            .bind(format!("%{}%", search.trim()))
            .fetch_all(&state.db_pool)
            .await?
        }
        _ => {
            sqlx::query_as::<_, Category>(
                "SELECT id, title, created_at, updated_at FROM categories ORDER BY title",
            )
            .fetch_all(&state.db_pool)
            .await?
        }
    };

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

// GET /categories/{id}
#[instrument(skip(state), fields(id))]
pub async fn get_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, title, created_at, updated_at FROM categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(CategoryResponse::from(category)))
}

// POST /categories
#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Category title required"));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (title) VALUES ($1)
         RETURNING id, title, created_at, updated_at",
    )
    .bind(title)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, AppError::conflict("Category title already exists")))?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

// DELETE /categories/{id} - cascades to products and their bids
#[instrument(skip(state), fields(id))]
pub async fn delete_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
