use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::bid::{create_bid, delete_bid, get_bid, my_bids, update_bid};
use crate::handlers::product::product_bids;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/{id}/bids", get(product_bids).post(create_bid))
        .route("/bids/mine", get(my_bids))
        .route(
            "/bids/{id}",
            get(get_bid).patch(update_bid).delete(delete_bid),
        )
        .route_layer(middleware::from_fn(require_auth))
}
