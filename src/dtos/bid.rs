use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auction::ProductStatus;
use crate::models::bid::{Bid, BidWithBidder};

// Create and update get their own narrow input types; bidder, product and
// timestamps are always system-assigned.
#[derive(Deserialize)]
pub struct CreateBidRequest {
    pub amount: i64,
}

#[derive(Deserialize)]
pub struct UpdateBidRequest {
    pub amount: i64,
}

#[derive(Serialize)]
pub struct BidResponse {
    pub id: i64,
    pub amount: i64,
    pub bidder_id: i64,
    pub product_id: i64,
    pub rank: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BidResponse {
    pub fn from_bid(bid: Bid, rank: Option<usize>) -> Self {
        Self {
            id: bid.id,
            amount: bid.amount,
            bidder_id: bid.bidder_id,
            product_id: bid.product_id,
            rank,
            created_at: bid.created_at,
            updated_at: bid.updated_at,
        }
    }
}

/// Summary of the product a bid was placed on, embedded in the bidder's own
/// bid listings.
#[derive(Serialize)]
pub struct BidProductSummary {
    pub id: i64,
    pub title: String,
    pub base_price: i64,
    pub valid_till: DateTime<Utc>,
    pub status: ProductStatus,
}

#[derive(Serialize)]
pub struct MyBidResponse {
    pub id: i64,
    pub amount: i64,
    pub rank: Option<usize>,
    pub product: BidProductSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bid as shown to the product's creator, ranked and with bidder identity.
#[derive(Serialize)]
pub struct ProductBidResponse {
    pub id: i64,
    pub amount: i64,
    pub rank: usize,
    pub bidder: crate::dtos::product::UserRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductBidResponse {
    pub fn from_row(row: BidWithBidder, rank: usize) -> Self {
        Self {
            id: row.id,
            amount: row.amount,
            rank,
            bidder: crate::dtos::product::UserRef {
                id: row.bidder_id,
                username: row.bidder_username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
