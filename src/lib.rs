pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod upstream;

use std::{path::Path, sync::Arc};

use axum::Router;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

pub use api::{ConfigRequest, FailureResponse, SuccessResponse};
pub use config::AppConfig;
pub use error::ServiceError;
pub use upstream::{GeminiClient, TextGenerator};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            generator: Arc::new(GeminiClient::from_config(config)),
        }
    }
}

/// The API plus the site's static pages, served from `static_root`.
pub fn build_app(state: AppState, static_root: &Path) -> Router {
    api::router(state)
        .route_service(
            "/",
            ServeFile::new(static_root.join("plantillas").join("index.html")),
        )
        .nest_service("/css", ServeDir::new(static_root.join("css")))
        .nest_service("/js", ServeDir::new(static_root.join("js")))
        .nest_service("/images", ServeDir::new(static_root.join("ImageSource")))
        .nest_service("/plantillas", ServeDir::new(static_root.join("plantillas")))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
