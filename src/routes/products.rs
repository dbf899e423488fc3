use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::product::{
    create_product, delete_product, get_product, list_products, mark_sold, my_products,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // Browsing ongoing auctions is public; everything that mutates or is
    // user-scoped sits behind auth.
    let open = Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product));

    let protected = Router::new()
        .route("/products", post(create_product))
        .route("/products/mine", get(my_products))
        .route("/products/{id}", delete(delete_product))
        .route("/products/{id}/sold", patch(mark_sold))
        .route_layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
