use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::user::{get_me, login_user, register_user};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let open = Router::new()
        .route("/users/register", post(register_user))
        .route("/users/login", post(login_user));

    let protected = Router::new()
        .route("/users/me", get(get_me))
        .route_layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
