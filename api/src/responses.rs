use serde::Serialize;
use study_system::{Artifact, Flashcard, QuizQuestion, Summary};

/// JSON body of the structured endpoints.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ArtifactResponse {
    Summary(Summary),
    Flashcards { flashcards: Vec<Flashcard> },
    Quiz { quiz: Vec<QuizQuestion> },
}

impl From<Artifact> for ArtifactResponse {
    fn from(artifact: Artifact) -> Self {
        match artifact {
            Artifact::Summary(summary) => ArtifactResponse::Summary(summary),
            Artifact::Flashcards(flashcards) => ArtifactResponse::Flashcards { flashcards },
            Artifact::Quiz(quiz) => ArtifactResponse::Quiz { quiz },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyseResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
