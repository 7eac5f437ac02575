use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::extract::extract_config;
use crate::prompt::build_prompt;
use crate::AppState;

use super::models::{ConfigRequest, FailureResponse, SuccessResponse};

pub async fn generate_pc_config(
    State(state): State<AppState>,
    payload: Result<Json<ConfigRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ServiceError> {
    let Json(request) = payload.map_err(|e| ServiceError::bad_request(e.body_text()))?;
    info!(
        budget = %request.budget,
        usage = %request.usage,
        brand = %request.brand,
        features = request.features.len(),
        "generating pc config"
    );

    let prompt = build_prompt(&request);
    let reply = state.generator.generate(&prompt).await?;

    let config = extract_config(&reply).inspect_err(|err| {
        if err.is_parse_failure() {
            debug!(%reply, "unusable model reply");
        }
    })?;

    Ok(Json(SuccessResponse::new(config)))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(FailureResponse::new("route not found")),
    )
        .into_response()
}
