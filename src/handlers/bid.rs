use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::instrument;

use crate::auction::{lifecycle, ranking, validator, Rejection};
use crate::dtos::bid::{
    BidProductSummary, BidResponse, CreateBidRequest, MyBidResponse, UpdateBidRequest,
};
use crate::error::AppError;
use crate::handlers::map_unique_violation;
use crate::handlers::product::{fetch_bid_snapshot, fetch_product};
use crate::middleware::auth::AuthContext;
use crate::models::bid::Bid;
use crate::state::AppState;

// POST /products/{id}/bids
//
// Validate-then-commit: fetch the current product/bid snapshot, run the pure
// validator, and only then write. The UNIQUE (bidder_id, product_id)
// constraint arbitrates the duplicate race the pre-check cannot see.
#[instrument(skip(state, auth, payload), fields(product_id))]
pub async fn create_bid(
    Path(product_id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateBidRequest>,
) -> Result<(StatusCode, Json<BidResponse>), AppError> {
    let now = Utc::now();
    let product = fetch_product(&state, product_id).await?;

    let already_bid: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM bids WHERE bidder_id = $1 AND product_id = $2)",
    )
    .bind(auth.user_id)
    .bind(product_id)
    .fetch_one(&state.db_pool)
    .await?;

    validator::validate_new_bid(payload.amount, &product, auth.user_id, already_bid, now)?;

    let bid = sqlx::query_as::<_, Bid>(
        "INSERT INTO bids (amount, bidder_id, product_id)
         VALUES ($1, $2, $3)
         RETURNING id, amount, bidder_id, product_id, created_at, updated_at",
    )
    .bind(payload.amount)
    .bind(auth.user_id)
    .bind(product_id)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, Rejection::DuplicateBid.into()))?;

    let snapshot = fetch_bid_snapshot(&state, product_id).await?;
    let rank = ranking::rank(bid.id, &snapshot);

    Ok((StatusCode::CREATED, Json(BidResponse::from_bid(bid, rank))))
}

// GET /bids/mine - caller's bids with product summary and current rank
#[instrument(skip(state, auth))]
pub async fn my_bids(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<MyBidResponse>>, AppError> {
    let now = Utc::now();

    let mine = sqlx::query_as::<_, Bid>(
        "SELECT id, amount, bidder_id, product_id, created_at, updated_at
         FROM bids WHERE bidder_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db_pool)
    .await?;

    // Point-in-time snapshot of every competing bid on the same products, so
    // each of the caller's bids can be ranked in one pass.
    let competing = sqlx::query_as::<_, Bid>(
        "SELECT id, amount, bidder_id, product_id, created_at, updated_at
         FROM bids WHERE product_id IN
           (SELECT product_id FROM bids WHERE bidder_id = $1)",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db_pool)
    .await?;

    let products = sqlx::query_as::<_, crate::models::product::Product>(
        "SELECT id, title, description, base_price, valid_till, is_sold,
                category_id, creator_id, created_at, updated_at
         FROM products WHERE id IN (SELECT product_id FROM bids WHERE bidder_id = $1)",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db_pool)
    .await?;

    let response = mine
        .into_iter()
        .filter_map(|bid| {
            let product = products.iter().find(|p| p.id == bid.product_id)?;
            let peers: Vec<Bid> = competing
                .iter()
                .filter(|b| b.product_id == bid.product_id)
                .cloned()
                .collect();
            let rank = ranking::rank(bid.id, &peers);

            Some(MyBidResponse {
                id: bid.id,
                amount: bid.amount,
                rank,
                product: BidProductSummary {
                    id: product.id,
                    title: product.title.clone(),
                    base_price: product.base_price,
                    valid_till: product.valid_till,
                    status: lifecycle::status(product, now),
                },
                created_at: bid.created_at,
                updated_at: bid.updated_at,
            })
        })
        .collect();

    Ok(Json(response))
}

// GET /bids/{id} - owner only
#[instrument(skip(state, auth), fields(id))]
pub async fn get_bid(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<BidResponse>, AppError> {
    let bid = fetch_owned_bid(&state, id, auth.user_id).await?;
    let snapshot = fetch_bid_snapshot(&state, bid.product_id).await?;
    let rank = ranking::rank(bid.id, &snapshot);
    Ok(Json(BidResponse::from_bid(bid, rank)))
}

// PATCH /bids/{id} - amend the amount while the auction is open
#[instrument(skip(state, auth, payload), fields(id))]
pub async fn update_bid(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateBidRequest>,
) -> Result<Json<BidResponse>, AppError> {
    let now = Utc::now();
    let bid = fetch_owned_bid(&state, id, auth.user_id).await?;
    let product = fetch_product(&state, bid.product_id).await?;

    validator::validate_bid_update(payload.amount, &product, now)?;

    let updated = sqlx::query_as::<_, Bid>(
        "UPDATE bids SET amount = $1, updated_at = $2 WHERE id = $3
         RETURNING id, amount, bidder_id, product_id, created_at, updated_at",
    )
    .bind(payload.amount)
    .bind(now)
    .bind(id)
    .fetch_one(&state.db_pool)
    .await?;

    let snapshot = fetch_bid_snapshot(&state, updated.product_id).await?;
    let rank = ranking::rank(updated.id, &snapshot);
    Ok(Json(BidResponse::from_bid(updated, rank)))
}

// DELETE /bids/{id} - cancel while the auction is open
#[instrument(skip(state, auth), fields(id))]
pub async fn delete_bid(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    let now = Utc::now();
    let bid = fetch_owned_bid(&state, id, auth.user_id).await?;
    let product = fetch_product(&state, bid.product_id).await?;

    validator::validate_bid_cancel(&product, now)?;

    sqlx::query("DELETE FROM bids WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_owned_bid(state: &AppState, id: i64, user_id: i64) -> Result<Bid, AppError> {
    let bid = sqlx::query_as::<_, Bid>(
        "SELECT id, amount, bidder_id, product_id, created_at, updated_at
         FROM bids WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Bid not found"))?;

    if bid.bidder_id != user_id {
        return Err(Rejection::NotOwner.into());
    }

    Ok(bid)
}
