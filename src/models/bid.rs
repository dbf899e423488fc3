use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Bid {
    pub id: i64,
    pub amount: i64,
    pub bidder_id: i64,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bid row joined with the bidder's username, used when listing the bids of a
/// product for its creator.
#[derive(Debug, FromRow)]
pub struct BidWithBidder {
    pub id: i64,
    pub amount: i64,
    pub bidder_id: i64,
    pub bidder_username: String,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
