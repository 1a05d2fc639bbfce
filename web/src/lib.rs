//! HTTP layer: axum controllers, routing, and error-to-status mapping.

pub(crate) mod controller;
pub mod error;
pub(crate) mod params;
pub mod router;

pub use error::{Error, Result};

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use domain::gateway::generation::GenerationProvider;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Shared state handed to every controller.
///
/// The generation provider is constructed once at startup and injected here
/// (never a process-global), so tests can substitute a fake. Everything in
/// this state is read-only after startup; concurrent requests share it
/// without coordination.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    generation: Arc<dyn GenerationProvider>,
}

impl AppState {
    pub fn new(config: Config, generation: Arc<dyn GenerationProvider>) -> Self {
        Self { config, generation }
    }

    pub fn generation_ref(&self) -> &dyn GenerationProvider {
        self.generation.as_ref()
    }
}

/// Bind the configured interface and serve the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{}:{}", host, app_state.config.port);

    let allowed_origins = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid allowed origin {origin}: {e}");
                None
            }
        })
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(allowed_origins));

    let router = router::define_routes(app_state).layer(cors);

    info!("Server starting, listening on http://{server_url}");

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    axum::serve(listener, router).await
}
