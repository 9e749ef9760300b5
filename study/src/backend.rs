use crate::config::ModelProfile;
use crate::error::GenerationError;
use crate::models::GenerationRequest;
use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Text chunks of an unstructured generation, in arrival order.
pub type TextStream = BoxStream<'static, Result<String, GenerationError>>;

/// The hosted model, seen as an opaque collaborator.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// One schema-constrained call; returns the raw text of the answer.
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
        profile: &ModelProfile,
    ) -> Result<String, GenerationError>;

    /// Free-text generation forwarded chunk by chunk.
    async fn stream(
        &self,
        instruction: &str,
        profile: &ModelProfile,
    ) -> Result<TextStream, GenerationError>;
}
