use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub fn router(state: AppState, static_dir: Option<&Path>, max_upload_bytes: usize) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/analyse", get(handlers::analyse))
        .route("/summarize", get(handlers::summarize_legacy))
        .route("/upload", post(handlers::upload))
        .route("/generate-flashcards", post(handlers::generate_flashcards))
        .route("/generate-quiz", post(handlers::generate_quiz))
        .with_state(Arc::new(state));

    // Front-end assets; anything they don't cover gets the JSON 404.
    let app = match static_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => {
            log::info!("Serving static files from {}", dir.display());
            let assets = ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(handlers::not_found.into_service());
            app.fallback_service(assets)
        }
        None => app.fallback(handlers::not_found),
    };

    app.layer(
        ServiceBuilder::new()
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
