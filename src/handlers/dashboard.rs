use axum::extract::{Extension, State};
use axum::Json;
use chrono::Utc;
use sqlx::QueryBuilder;
use tracing::instrument;

use crate::auction::{lifecycle, ranking};
use crate::dtos::bid::{BidProductSummary, MyBidResponse};
use crate::dtos::dashboard::{CategoryCount, DashboardResponse, DashboardStats};
use crate::dtos::product::ProductResponse;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::bid::Bid;
use crate::models::product::{Product, ProductListing};
use crate::state::AppState;

// GET /dashboard - per-user auction outcome aggregates
#[instrument(skip(state, auth))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DashboardResponse>, AppError> {
    let now = Utc::now();
    let user_id = auth.user_id;

    let ongoing_auctions_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM products
         WHERE creator_id = $1 AND is_sold = FALSE AND valid_till > $2",
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(&state.db_pool)
    .await?;

    let completed_auctions_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM products WHERE creator_id = $1 AND is_sold = TRUE",
    )
    .bind(user_id)
    .fetch_one(&state.db_pool)
    .await?;

    let pending_bids_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bids b
         JOIN products p ON b.product_id = p.id
         WHERE b.bidder_id = $1 AND p.is_sold = FALSE AND p.valid_till > $2",
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(&state.db_pool)
    .await?;

    let top_ongoing_auctions = top_ongoing_auctions(&state, user_id, now).await?;
    let top_pending_bids = top_pending_bids(&state, user_id, now).await?;
    let successful_bids_count = successful_bids_count(&state, user_id).await?;
    let category_counts = category_counts(&state, user_id).await?;

    Ok(Json(DashboardResponse {
        stats: DashboardStats {
            ongoing_auctions_count,
            completed_auctions_count,
            pending_bids_count,
            successful_bids_count,
        },
        top_ongoing_auctions,
        top_pending_bids,
        category_counts,
    }))
}

// Soonest-ending open auctions of the caller.
async fn top_ongoing_auctions(
    state: &AppState,
    user_id: i64,
    now: chrono::DateTime<Utc>,
) -> Result<Vec<ProductResponse>, AppError> {
    let mut qb = QueryBuilder::new(
        "SELECT p.id, p.title, p.description, p.base_price, p.valid_till, \
         p.is_sold, p.category_id, c.title AS category_title, \
         p.creator_id, u.username AS creator_username, \
         p.created_at, p.updated_at, \
         (SELECT COUNT(*) FROM bids b WHERE b.product_id = p.id) AS bid_count, \
         (SELECT MAX(b.amount) FROM bids b WHERE b.product_id = p.id) AS highest_amount \
         FROM products p \
         JOIN categories c ON p.category_id = c.id \
         JOIN users u ON p.creator_id = u.id \
         WHERE p.creator_id = ",
    );
    qb.push_bind(user_id);
    qb.push(" AND p.is_sold = FALSE AND p.valid_till > ").push_bind(now);
    qb.push(" ORDER BY p.valid_till ASC LIMIT 5");

    let listings: Vec<ProductListing> = qb.build_query_as().fetch_all(&state.db_pool).await?;
    Ok(listings
        .into_iter()
        .map(|l| ProductResponse::from_listing(l, now))
        .collect())
}

// Caller's bids on still-open auctions, ranked against the competition.
async fn top_pending_bids(
    state: &AppState,
    user_id: i64,
    now: chrono::DateTime<Utc>,
) -> Result<Vec<MyBidResponse>, AppError> {
    let pending = sqlx::query_as::<_, Bid>(
        "SELECT b.id, b.amount, b.bidder_id, b.product_id, b.created_at, b.updated_at
         FROM bids b
         JOIN products p ON b.product_id = p.id
         WHERE b.bidder_id = $1 AND p.is_sold = FALSE AND p.valid_till > $2
         ORDER BY b.created_at DESC LIMIT 5",
    )
    .bind(user_id)
    .bind(now)
    .fetch_all(&state.db_pool)
    .await?;

    let mut response = Vec::with_capacity(pending.len());
    for bid in pending {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, title, description, base_price, valid_till, is_sold,
                    category_id, creator_id, created_at, updated_at
             FROM products WHERE id = $1",
        )
        .bind(bid.product_id)
        .fetch_one(&state.db_pool)
        .await?;

        let snapshot = sqlx::query_as::<_, Bid>(
            "SELECT id, amount, bidder_id, product_id, created_at, updated_at
             FROM bids WHERE product_id = $1",
        )
        .bind(bid.product_id)
        .fetch_all(&state.db_pool)
        .await?;

        let rank = ranking::rank(bid.id, &snapshot);
        response.push(MyBidResponse {
            id: bid.id,
            amount: bid.amount,
            rank,
            product: BidProductSummary {
                id: product.id,
                title: product.title.clone(),
                base_price: product.base_price,
                valid_till: product.valid_till,
                status: lifecycle::status(&product, now),
            },
            created_at: bid.created_at,
            updated_at: bid.updated_at,
        });
    }

    Ok(response)
}

// A bid is successful when its product sold and the caller holds the highest
// bid of that product's snapshot.
async fn successful_bids_count(state: &AppState, user_id: i64) -> Result<i64, AppError> {
    let candidates = sqlx::query_as::<_, Bid>(
        "SELECT b.id, b.amount, b.bidder_id, b.product_id, b.created_at, b.updated_at
         FROM bids b
         JOIN products p ON b.product_id = p.id
         WHERE b.bidder_id = $1 AND p.is_sold = TRUE",
    )
    .bind(user_id)
    .fetch_all(&state.db_pool)
    .await?;

    let competing = sqlx::query_as::<_, Bid>(
        "SELECT b.id, b.amount, b.bidder_id, b.product_id, b.created_at, b.updated_at
         FROM bids b
         JOIN products p ON b.product_id = p.id
         WHERE p.is_sold = TRUE AND p.id IN
           (SELECT product_id FROM bids WHERE bidder_id = $1)",
    )
    .bind(user_id)
    .fetch_all(&state.db_pool)
    .await?;

    let mut count = 0i64;
    for bid in &candidates {
        let peers: Vec<Bid> = competing
            .iter()
            .filter(|b| b.product_id == bid.product_id)
            .cloned()
            .collect();
        if ranking::highest_bid(&peers).map(|b| b.id) == Some(bid.id) {
            count += 1;
        }
    }

    Ok(count)
}

#[derive(sqlx::FromRow)]
struct CategoryCountRow {
    category_id: i64,
    category_title: String,
    product_count: i64,
}

async fn category_counts(state: &AppState, user_id: i64) -> Result<Vec<CategoryCount>, AppError> {
    let rows = sqlx::query_as::<_, CategoryCountRow>(
        "SELECT c.id AS category_id, c.title AS category_title, COUNT(p.id) AS product_count
         FROM products p
         JOIN categories c ON p.category_id = c.id
         WHERE p.creator_id = $1
         GROUP BY c.id, c.title
         ORDER BY product_count DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db_pool)
    .await?;

    let total: i64 = rows.iter().map(|r| r.product_count).sum();
    Ok(rows
        .into_iter()
        .map(|r| CategoryCount {
            category_id: r.category_id,
            category_title: r.category_title,
            product_count: r.product_count,
            category_percentage: if total > 0 {
                (r.product_count as f64 / total as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect())
}
