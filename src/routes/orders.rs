use axum::{middleware, routing::get, Router};

use crate::handlers::orders::{create_order, get_orders};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_orders).post(create_order))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
