use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::ServiceError;

/// Something that turns a prompt into free text.
///
/// The handler only depends on this trait, so tests can swap the Gemini
/// client for a canned reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;

    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
    timeout_ms: u64,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: &str,
        timeout_ms: u64,
    ) -> Self {
        let model = model.into();
        let url = format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model,
            url,
            timeout_ms,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            &config.base_url,
            config.timeout_ms,
        )
    }

    /// Send, status check and body decode; the deadline covers all of it.
    async fn request_text(&self, prompt: &str) -> Result<String, ServiceError> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::upstream(format!("failed to send request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            return Err(ServiceError::UpstreamStatus { status, body });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::upstream(format!("failed to decode response: {e}")))?;

        body.first_text()
            .filter(|text| !text.trim().is_empty())
            .ok_or(ServiceError::EmptyReply)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        if self.api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey);
        }

        // 0 disables the deadline.
        let text = if self.timeout_ms == 0 {
            self.request_text(prompt).await?
        } else {
            timeout(
                Duration::from_millis(self.timeout_ms),
                self.request_text(prompt),
            )
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout_ms))??
        };

        debug!(model = %self.model, chars = text.len(), "model reply received");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    #[test]
    fn builds_generate_content_url() {
        let client = GeminiClient::new("key", "gemini-2.5-flash", "http://localhost:9999/", 1_000);
        assert_eq!(
            client.url,
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn reads_first_candidate_text() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.first_text().as_deref(), Some("hello"));
    }

    #[test]
    fn missing_candidates_yield_nothing() {
        let body: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.first_text(), None);

        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(body.first_text(), None);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_sending() {
        let client = GeminiClient::new("", "gemini-2.5-flash", "http://127.0.0.1:1", 1_000);
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey));
    }

    /// Answers with headers and one body byte, then never finishes the body.
    async fn spawn_stalled_upstream() -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{",
                        )
                        .await;
                    tokio::time::sleep(Duration::from_secs(5)).await;
                });
            }
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn deadline_covers_a_stalled_body() {
        let base_url = spawn_stalled_upstream().await;
        let client = GeminiClient::new("key", "gemini-2.5-flash", &base_url, 200);

        let started = std::time::Instant::now();
        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, ServiceError::Timeout(200)), "got {err}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn zero_timeout_disables_the_deadline() {
        let client = GeminiClient::new("key", "gemini-2.5-flash", "http://127.0.0.1:1", 0);
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)), "got {err}");
    }
}
