use axum::{routing::post, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(crate::handlers::auth::signup))
        .route("/login", post(crate::handlers::auth::login))
}
