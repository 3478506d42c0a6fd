pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pricing::handlers::{handle_estimate, handle_list_terrains};
use crate::quote::handlers::handle_quote;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pricing API
        .route("/api/v1/terrains", get(handle_list_terrains))
        .route("/api/v1/estimate", post(handle_estimate))
        // Quote API
        .route("/api/v1/quote", post(handle_quote))
        .with_state(state)
}
