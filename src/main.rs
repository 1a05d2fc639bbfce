use domain::gateway::gemini::GeminiClient;
use domain::gateway::generation::GenerationProvider;
use log::*;
use service::{config::Config, logging::Logger};
use std::sync::Arc;
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    // Model fallback selection happens inside the constructor, once.
    let generation = match GeminiClient::new(&config).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to construct Gemini client: {e}");
            std::process::exit(1);
        }
    };

    info!("Active generation model: {}", generation.model_id());

    let app_state = AppState::new(config, generation);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
