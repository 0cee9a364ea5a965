use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::profile::{get_profile, update_profile};
use crate::handlers::wallet::{add_money, get_transactions};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/add-money", post(add_money))
        .route("/transactions", get(get_transactions))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
