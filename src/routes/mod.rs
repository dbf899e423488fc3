pub mod bids;
pub mod categories;
pub mod dashboard;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(categories::routes())
        .merge(products::routes())
        .merge(bids::routes())
        .merge(dashboard::routes())
}
