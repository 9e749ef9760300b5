use crate::artifact::ArtifactKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while turning a document into a generated artifact.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The encoder was handed something it cannot turn into a payload.
    #[error("invalid input: {reason}")]
    InvalidInputKind { reason: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The outbound model call failed (network, auth, quota, blocked prompt).
    #[error("model call failed: {0}")]
    ExternalCallFailure(String),

    /// The model answered with text that is not JSON.
    #[error("model returned malformed JSON: {reason}")]
    MalformedResponse { reason: String },

    /// The JSON parsed but does not have the shape of the requested artifact.
    #[error("incomplete {kind} result: {reason}")]
    IncompleteResult { kind: ArtifactKind, reason: String },
}

impl GenerationError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInputKind {
            reason: reason.into(),
        }
    }

    /// True when the model itself could not be reached or refused the call.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalCallFailure(_))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::ExternalCallFailure(err.without_url().to_string())
    }
}
