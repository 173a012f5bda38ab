pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::post::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/render",
            post(handlers::render_post).get(handlers::render_usage),
        )
        .with_state(state)
}
