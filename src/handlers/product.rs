use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use sqlx::QueryBuilder;
use tracing::instrument;

use crate::auction::{lifecycle, Rejection};
use crate::dtos::bid::ProductBidResponse;
use crate::dtos::product::{CreateProductRequest, ProductFilter, ProductResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::bid::BidWithBidder;
use crate::models::product::{Product, ProductListing};
use crate::state::AppState;

// Listing shape shared by every product read: row + category/creator names +
// bid aggregates. Status and time left are derived in the DTO layer.
const LISTING_SELECT: &str = "SELECT p.id, p.title, p.description, p.base_price, p.valid_till, \
     p.is_sold, p.category_id, c.title AS category_title, \
     p.creator_id, u.username AS creator_username, \
     p.created_at, p.updated_at, \
     (SELECT COUNT(*) FROM bids b WHERE b.product_id = p.id) AS bid_count, \
     (SELECT MAX(b.amount) FROM bids b WHERE b.product_id = p.id) AS highest_amount \
     FROM products p \
     JOIN categories c ON p.category_id = c.id \
     JOIN users u ON p.creator_id = u.id";

fn push_filters(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ProductFilter) {
    if let Some(category_id) = filter.category {
        qb.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(creator_id) = filter.creator {
        qb.push(" AND p.creator_id = ").push_bind(creator_id);
    }
    if let Some(min_price) = filter.min_price {
        qb.push(" AND p.base_price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND p.base_price <= ").push_bind(max_price);
    }
    if let Some(search) = filter.search.as_deref() {
        let search = search.trim();
        if !search.is_empty() {
            qb.push(" AND p.title ILIKE ").push_bind(format!("%{search}%"));
        }
    }
}

// GET /products - ongoing auctions, newest first
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let now = Utc::now();

    let mut qb = QueryBuilder::new(LISTING_SELECT);
    qb.push(" WHERE p.is_sold = FALSE AND p.valid_till > ").push_bind(now);
    push_filters(&mut qb, &filter);
    qb.push(" ORDER BY p.created_at DESC");

    let listings: Vec<ProductListing> =
        qb.build_query_as().fetch_all(&state.db_pool).await?;

    let response = listings
        .into_iter()
        .map(|l| ProductResponse::from_listing(l, now))
        .collect();
    Ok(Json(response))
}

// GET /products/mine - caller's products regardless of status
#[instrument(skip(state, auth))]
pub async fn my_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let now = Utc::now();

    let mut qb = QueryBuilder::new(LISTING_SELECT);
    qb.push(" WHERE p.creator_id = ").push_bind(auth.user_id);
    push_filters(&mut qb, &filter);
    qb.push(" ORDER BY p.created_at DESC");

    let listings: Vec<ProductListing> =
        qb.build_query_as().fetch_all(&state.db_pool).await?;

    let response = listings
        .into_iter()
        .map(|l| ProductResponse::from_listing(l, now))
        .collect();
    Ok(Json(response))
}

// GET /products/{id}
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let now = Utc::now();
    let listing = fetch_listing(&state, id).await?;
    Ok(Json(ProductResponse::from_listing(listing, now)))
}

// POST /products - creator comes from the token, never the payload
#[instrument(skip(state, auth, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let now = Utc::now();

    let title = payload.title.trim();
    if title.is_empty() || title.len() > 100 {
        return Err(AppError::validation("Title must be 1-100 characters"));
    }
    if payload.description.len() > 500 {
        return Err(AppError::validation("Description must be at most 500 characters"));
    }
    if payload.base_price <= 0 {
        return Err(AppError::validation("Base price must be a positive integer"));
    }
    if payload.valid_till <= now {
        return Err(AppError::validation("Deadline must not be in the past"));
    }

    let category_title: Option<String> =
        sqlx::query_scalar("SELECT title FROM categories WHERE id = $1")
            .bind(payload.category_id)
            .fetch_optional(&state.db_pool)
            .await?;
    let category_title =
        category_title.ok_or_else(|| AppError::not_found("Category not found"))?;

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (title, description, base_price, valid_till, category_id, creator_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, title, description, base_price, valid_till, is_sold,
                   category_id, creator_id, created_at, updated_at",
    )
    .bind(title)
    .bind(&payload.description)
    .bind(payload.base_price)
    .bind(payload.valid_till)
    .bind(payload.category_id)
    .bind(auth.user_id)
    .fetch_one(&state.db_pool)
    .await?;

    let listing = ProductListing {
        id: product.id,
        title: product.title,
        description: product.description,
        base_price: product.base_price,
        valid_till: product.valid_till,
        is_sold: product.is_sold,
        category_id: product.category_id,
        category_title,
        creator_id: product.creator_id,
        creator_username: auth.username,
        created_at: product.created_at,
        updated_at: product.updated_at,
        bid_count: 0,
        highest_amount: None,
    };

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::from_listing(listing, now)),
    ))
}

// DELETE /products/{id} - creator only, cascades to bids
#[instrument(skip(state, auth), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    let product = fetch_product(&state, id).await?;
    if product.creator_id != auth.user_id {
        return Err(Rejection::NotOwner.into());
    }

    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// PATCH /products/{id}/sold - settle a finished auction, once
#[instrument(skip(state, auth), fields(id))]
pub async fn mark_sold(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ProductResponse>, AppError> {
    let now = Utc::now();
    let product = fetch_product(&state, id).await?;

    lifecycle::check_mark_sold(&product, auth.user_id, now)?;

    // Guard the transition at the row level as well; a concurrent settle
    // that won the race surfaces as AlreadySold.
    let result = sqlx::query(
        "UPDATE products SET is_sold = TRUE, updated_at = $1 WHERE id = $2 AND is_sold = FALSE",
    )
    .bind(now)
    .bind(id)
    .execute(&state.db_pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(Rejection::AlreadySold.into());
    }

    let listing = fetch_listing(&state, id).await?;
    Ok(Json(ProductResponse::from_listing(listing, now)))
}

// GET /products/{id}/bids - ranked bids, visible to the creator only
#[instrument(skip(state, auth), fields(id))]
pub async fn product_bids(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ProductBidResponse>>, AppError> {
    let product = fetch_product(&state, id).await?;
    if product.creator_id != auth.user_id {
        return Err(Rejection::NotOwner.into());
    }

    let rows = sqlx::query_as::<_, BidWithBidder>(
        "SELECT b.id, b.amount, b.bidder_id, u.username AS bidder_username,
                b.product_id, b.created_at, b.updated_at
         FROM bids b
         JOIN users u ON b.bidder_id = u.id
         WHERE b.product_id = $1
         ORDER BY b.amount DESC, b.updated_at ASC",
    )
    .bind(id)
    .fetch_all(&state.db_pool)
    .await?;

    // Rows arrive in ranking order; positions are the ranks.
    let response = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| ProductBidResponse::from_row(row, i + 1))
        .collect();
    Ok(Json(response))
}

pub(crate) async fn fetch_product(state: &AppState, id: i64) -> Result<Product, AppError> {
    sqlx::query_as::<_, Product>(
        "SELECT id, title, description, base_price, valid_till, is_sold,
                category_id, creator_id, created_at, updated_at
         FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| Rejection::ProductNotFound.into())
}

async fn fetch_listing(state: &AppState, id: i64) -> Result<ProductListing, AppError> {
    let mut qb = QueryBuilder::new(LISTING_SELECT);
    qb.push(" WHERE p.id = ").push_bind(id);

    qb.build_query_as::<ProductListing>()
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| Rejection::ProductNotFound.into())
}

// Ranking helper shared with the bid handlers: snapshot of a product's bids.
pub(crate) async fn fetch_bid_snapshot(
    state: &AppState,
    product_id: i64,
) -> Result<Vec<crate::models::bid::Bid>, AppError> {
    let bids = sqlx::query_as::<_, crate::models::bid::Bid>(
        "SELECT id, amount, bidder_id, product_id, created_at, updated_at
         FROM bids WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_all(&state.db_pool)
    .await?;
    Ok(bids)
}
