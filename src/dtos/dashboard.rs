use serde::Serialize;

use crate::dtos::bid::MyBidResponse;
use crate::dtos::product::ProductResponse;

#[derive(Serialize)]
pub struct DashboardStats {
    pub ongoing_auctions_count: i64,
    pub completed_auctions_count: i64,
    pub pending_bids_count: i64,
    pub successful_bids_count: i64,
}

#[derive(Serialize)]
pub struct CategoryCount {
    pub category_id: i64,
    pub category_title: String,
    pub product_count: i64,
    pub category_percentage: f64,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub top_ongoing_auctions: Vec<ProductResponse>,
    pub top_pending_bids: Vec<MyBidResponse>,
    pub category_counts: Vec<CategoryCount>,
}
