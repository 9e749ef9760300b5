use crate::artifact::{Artifact, ArtifactKind};
use crate::backend::{ModelBackend, TextStream};
use crate::config::ModelProfiles;
use crate::encoder::DocumentPayload;
use crate::error::GenerationError;
use crate::models::GenerationRequest;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*\z").expect("valid fence regex")
});

/// Pairs a document with the instruction and schema of an artifact kind,
/// calls the model once and checks what comes back.
pub struct GenerationClient {
    backend: Arc<dyn ModelBackend>,
    profiles: ModelProfiles,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn ModelBackend>, profiles: ModelProfiles) -> Self {
        Self { backend, profiles }
    }

    pub async fn generate(
        &self,
        kind: ArtifactKind,
        payload: &DocumentPayload,
    ) -> Result<Artifact, GenerationError> {
        let start_time = std::time::Instant::now();

        let request = GenerationRequest {
            kind,
            instruction: kind.instruction(),
            payload,
            output_schema: kind.schema(),
        };

        let text = self
            .backend
            .generate(&request, self.profiles.for_kind(kind))
            .await?;

        let value = parse_json(&text)?;
        let artifact = Artifact::from_value(kind, value)?;

        log::info!(
            "Generated {} in {}ms",
            kind,
            start_time.elapsed().as_millis()
        );

        Ok(artifact)
    }

    /// Unstructured generation; chunks are passed through untouched.
    pub async fn stream(&self, instruction: &str) -> Result<TextStream, GenerationError> {
        self.backend
            .stream(instruction, self.profiles.streaming())
            .await
    }
}

/// Parse model output as JSON, tolerating one surrounding Markdown fence.
pub fn parse_json(text: &str) -> Result<Value, GenerationError> {
    let body = match CODE_FENCE.captures(text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => text,
    };

    serde_json::from_str(body.trim()).map_err(|e| GenerationError::MalformedResponse {
        reason: e.to_string(),
    })
}
