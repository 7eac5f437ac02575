mod handlers;
mod models;

use axum::{routing::post, Router};

use crate::AppState;

pub use handlers::{generate_pc_config, not_found};
pub use models::{ConfigRequest, FailureResponse, SuccessResponse};

pub const GENERATE_PATH: &str = "/api/generate-pc-config";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_pc_config))
        .fallback(not_found)
        .with_state(state)
}
