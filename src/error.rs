use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::FailureResponse;

/// Every way a configuration request can fail on the server.
///
/// The client only ever sees the message: all variants map to the same
/// `{success: false, error}` envelope with a 500 status.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("model integration missing: set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("model request failed: {0}")]
    Upstream(String),

    #[error("model request failed ({status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("model request timed out after {0} ms")]
    Timeout(u64),

    #[error("no response received from the model")]
    EmptyReply,

    #[error("could not find a JSON object in the model response")]
    NoJson,

    #[error("model response contained malformed JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("model response is missing `{0}`")]
    IncompleteConfig(&'static str),
}

impl ServiceError {
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// True when the model answered but the answer could not be used.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::NoJson | Self::InvalidJson(_) | Self::IncompleteConfig(_)
        )
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        error!(error = %self, "pc config generation failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailureResponse::new(self.to_string())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn every_failure_is_a_500_envelope() {
        let response = ServiceError::NoJson.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(
            value["error"],
            "could not find a JSON object in the model response"
        );
    }

    #[test]
    fn classifies_parse_failures() {
        assert!(ServiceError::NoJson.is_parse_failure());
        assert!(ServiceError::IncompleteConfig("totalPrice").is_parse_failure());
        assert!(!ServiceError::EmptyReply.is_parse_failure());
        assert!(!ServiceError::Timeout(10).is_parse_failure());
    }
}
