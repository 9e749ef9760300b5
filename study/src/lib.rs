pub mod artifact;
pub mod backend;
pub mod config;
pub mod encoder;
pub mod error;
pub mod gemini_service;
pub mod generation_client;
pub mod models;
pub mod schema;
pub mod view_state;

pub use artifact::{Artifact, ArtifactKind, Flashcard, QuizQuestion, Summary, SummarySection};
pub use backend::{ModelBackend, TextStream};
pub use config::{Config, ModelProfile, ModelProfiles};
pub use encoder::{encode, resolve_mime_type, DocumentPayload, DocumentSource, PDF_MIME_TYPE};
pub use error::GenerationError;
pub use gemini_service::GeminiService;
pub use generation_client::GenerationClient;
pub use models::*;
pub use schema::{SchemaDescriptor, SchemaViolation};
