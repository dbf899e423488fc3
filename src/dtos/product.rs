use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auction::lifecycle::{self, ProductStatus};
use crate::models::product::ProductListing;

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub base_price: i64,
    pub valid_till: DateTime<Utc>,
    pub category_id: i64,
}

/// Listing filters taken from query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct ProductFilter {
    pub category: Option<i64>,
    pub creator: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub title: String,
}

#[derive(Serialize)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub base_price: i64,
    pub valid_till: DateTime<Utc>,
    pub status: ProductStatus,
    pub time_left_seconds: i64,
    pub category: CategoryRef,
    pub creator: UserRef,
    pub bid_count: i64,
    pub highest_bid_amount: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    /// Derived fields (status, time left) are computed at response-build time
    /// against the supplied clock, never read from storage.
    pub fn from_listing(listing: ProductListing, now: DateTime<Utc>) -> Self {
        let product = crate::models::product::Product {
            id: listing.id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            base_price: listing.base_price,
            valid_till: listing.valid_till,
            is_sold: listing.is_sold,
            category_id: listing.category_id,
            creator_id: listing.creator_id,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        };

        Self {
            id: listing.id,
            title: listing.title,
            description: listing.description,
            base_price: listing.base_price,
            valid_till: listing.valid_till,
            status: lifecycle::status(&product, now),
            time_left_seconds: lifecycle::time_left(&product, now).num_seconds(),
            category: CategoryRef {
                id: listing.category_id,
                title: listing.category_title,
            },
            creator: UserRef {
                id: listing.creator_id,
                username: listing.creator_username,
            },
            bid_count: listing.bid_count,
            highest_bid_amount: listing.highest_amount,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}
