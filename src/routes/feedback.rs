use axum::{middleware, routing::get, Router};

use crate::handlers::feedback::{get_feedback, get_order_feedback, submit_feedback};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_feedback).post(submit_feedback))
        .route("/order/:order_id", get(get_order_feedback))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
