use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::category::{create_category, delete_category, get_category, list_categories};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // Anyone can browse categories; writes require a logged-in user.
    let open = Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}", get(get_category));

    let protected = Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .route_layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
