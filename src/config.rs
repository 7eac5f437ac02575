use std::{env, path::PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PORT: u16 = 5500;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
    pub static_root: PathBuf,
}

impl AppConfig {
    /// Reads the process environment. A `.env` file in the working directory
    /// is loaded first when present.
    ///
    /// `GEMINI_API_KEY` is not checked here; requests fail with a clear
    /// message until it is set. `UPSTREAM_TIMEOUT_MS=0` turns the model
    /// deadline off.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_ms = env::var("UPSTREAM_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60_000);

        let static_root = env::var("STATIC_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Self {
            port,
            api_key,
            model,
            base_url,
            timeout_ms,
            static_root,
        }
    }
}
