use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub base_price: i64,
    pub valid_till: DateTime<Utc>,
    pub is_sold: bool,
    pub category_id: i64,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row joined with its category title, creator username and bid count.
/// Shape of the listing/detail queries.
#[derive(Debug, FromRow)]
pub struct ProductListing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub base_price: i64,
    pub valid_till: DateTime<Utc>,
    pub is_sold: bool,
    pub category_id: i64,
    pub category_title: String,
    pub creator_id: i64,
    pub creator_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub bid_count: i64,
    pub highest_amount: Option<i64>,
}
