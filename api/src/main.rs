mod error;
mod handlers;
mod responses;
mod routes;
mod state;
mod upload;


use state::AppState;
use std::sync::Arc;
use study_system::{Config, GeminiService, GenerationClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let backend = Arc::new(GeminiService::from_config(&config));
    let client = GenerationClient::new(backend, config.profiles());
    log::info!("Generation client ready (model {})", config.model);

    match &config.legacy_document_path {
        Some(path) => log::info!("Legacy /summarize reads {}", path.display()),
        None => log::info!("Legacy /summarize disabled (LEGACY_DOCUMENT_PATH not set)"),
    }

    let state = AppState::new(client, &config);
    let app = routes::router(state, Some(&config.static_dir), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
