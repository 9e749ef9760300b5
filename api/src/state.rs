use std::path::PathBuf;
use std::sync::Arc;
use study_system::{Config, GenerationClient};

/// Read-only state shared by every request.
pub struct AppState {
    pub client: Arc<GenerationClient>,
    pub legacy_document_path: Option<PathBuf>,
    pub analyse_prompt: String,
}

impl AppState {
    pub fn new(client: GenerationClient, config: &Config) -> Self {
        Self {
            client: Arc::new(client),
            legacy_document_path: config.legacy_document_path.clone(),
            analyse_prompt: config.analyse_prompt.clone(),
        }
    }
}
