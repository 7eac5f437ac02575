use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::{ConfigRequest, GENERATE_PATH};

use super::view::PcConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The service answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("request to the config service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from the config service ({status}): {reason}")]
    Malformed { status: u16, reason: String },
}

impl TransportError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(error) => format!("Failed to generate configuration: {error}"),
            _ => "Something went wrong, check the logs.".to_string(),
        }
    }
}

/// One round-trip to the config service.
#[async_trait]
pub trait ConfigTransport: Send + Sync {
    async fn generate(&self, request: &ConfigRequest) -> Result<PcConfig, TransportError>;
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes a service response body regardless of HTTP status; failures carry
/// their message in the same envelope.
pub fn decode_response(status: u16, body: &[u8]) -> Result<PcConfig, TransportError> {
    let malformed = |reason: String| TransportError::Malformed { status, reason };

    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?;

    if !envelope.success {
        return Err(TransportError::Rejected(
            envelope
                .error
                .unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    let data = envelope
        .data
        .ok_or_else(|| malformed("missing `data`".to_string()))?;
    serde_json::from_value(data).map_err(|e| malformed(e.to_string()))
}

pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl ConfigTransport for HttpTransport {
    async fn generate(&self, request: &ConfigRequest) -> Result<PcConfig, TransportError> {
        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}
