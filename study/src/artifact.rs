use crate::error::GenerationError;
use crate::schema::{SchemaDescriptor, FLASHCARD_SCHEMA, QUIZ_SCHEMA, SUMMARY_SCHEMA};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const SUMMARY_INSTRUCTION: &str = r#"You are a study assistant. Read the attached document and write a structured summary of it.

INSTRUCTIONS:
1. Put the title of the document in "articleTitle"
2. Split the summary into sections following the structure of the document
3. Give every section a short "subtitle" and a "content" paragraph of a few sentences
4. Only use information present in the document"#;

const FLASHCARD_INSTRUCTION: &str = r#"You are a study assistant. Read the attached document and write flashcards to revise it.

INSTRUCTIONS:
1. Each flashcard has one "question" and its "answer"
2. Cover the key notions, definitions and facts of the document
3. Keep answers short, one or two sentences
4. Only use information present in the document"#;

const QUIZ_INSTRUCTION: &str = r#"You are a study assistant. Read the attached document and write a multiple-choice quiz about it.

INSTRUCTIONS:
1. Each entry has a "question", a list of "options" and the "correctAnswer"
2. Give between 3 and 5 options per question, only one of them correct
3. "correctAnswer" must be copied verbatim from "options"
4. Only use information present in the document"#;

/// The kinds of study material that can be generated from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Summary,
    Flashcards,
    Quiz,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Summary,
        ArtifactKind::Flashcards,
        ArtifactKind::Quiz,
    ];

    pub fn schema(self) -> &'static SchemaDescriptor {
        match self {
            ArtifactKind::Summary => &SUMMARY_SCHEMA,
            ArtifactKind::Flashcards => &FLASHCARD_SCHEMA,
            ArtifactKind::Quiz => &QUIZ_SCHEMA,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            ArtifactKind::Summary => SUMMARY_INSTRUCTION,
            ArtifactKind::Flashcards => FLASHCARD_INSTRUCTION,
            ArtifactKind::Quiz => QUIZ_INSTRUCTION,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Summary => "summary",
            ArtifactKind::Flashcards => "flashcards",
            ArtifactKind::Quiz => "quiz",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub article_title: String,
    pub summary: Vec<SummarySection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySection {
    pub subtitle: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}

/// A generated artifact that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Summary(Summary),
    Flashcards(Vec<Flashcard>),
    Quiz(Vec<QuizQuestion>),
}

impl Artifact {
    /// Validate `value` against the schema of `kind` and convert it.
    pub fn from_value(kind: ArtifactKind, value: Value) -> Result<Self, GenerationError> {
        let incomplete = |reason: String| GenerationError::IncompleteResult { kind, reason };

        kind.schema()
            .validate(&value)
            .map_err(|violation| incomplete(violation.to_string()))?;

        let artifact = match kind {
            ArtifactKind::Summary => Artifact::Summary(
                serde_json::from_value(value).map_err(|e| incomplete(e.to_string()))?,
            ),
            ArtifactKind::Flashcards => Artifact::Flashcards(
                serde_json::from_value(value).map_err(|e| incomplete(e.to_string()))?,
            ),
            ArtifactKind::Quiz => {
                let quiz: Vec<QuizQuestion> =
                    serde_json::from_value(value).map_err(|e| incomplete(e.to_string()))?;
                if let Some(i) = quiz
                    .iter()
                    .position(|q| !q.options.contains(&q.correct_answer))
                {
                    return Err(incomplete(format!(
                        "$[{i}].correctAnswer: not one of the options"
                    )));
                }
                Artifact::Quiz(quiz)
            }
        };

        Ok(artifact)
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Summary(_) => ArtifactKind::Summary,
            Artifact::Flashcards(_) => ArtifactKind::Flashcards,
            Artifact::Quiz(_) => ArtifactKind::Quiz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_kind_has_its_own_schema_and_instruction() {
        for kind in ArtifactKind::ALL {
            assert!(!kind.instruction().is_empty());
            for other in ArtifactKind::ALL {
                if kind != other {
                    assert_ne!(kind.schema(), other.schema());
                    assert_ne!(kind.instruction(), other.instruction());
                }
            }
        }
    }

    #[test]
    fn summary_round_trips_to_the_wire_names() {
        let value = json!({
            "articleTitle": "Ownership",
            "summary": [{ "subtitle": "Moves", "content": "Values have one owner." }]
        });
        let artifact = Artifact::from_value(ArtifactKind::Summary, value.clone()).unwrap();
        let Artifact::Summary(summary) = artifact else {
            panic!("expected a summary");
        };
        assert_eq!(summary.article_title, "Ownership");
        assert_eq!(serde_json::to_value(&summary).unwrap(), value);
    }

    #[test]
    fn summary_without_sections_is_incomplete() {
        let err = Artifact::from_value(
            ArtifactKind::Summary,
            json!({ "articleTitle": "Empty", "summary": [] }),
        )
        .unwrap_err();
        assert!(
            matches!(err, GenerationError::IncompleteResult { kind: ArtifactKind::Summary, .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn quiz_answer_must_be_an_option() {
        let value = json!([
            { "question": "2 + 2?", "options": ["3", "4"], "correctAnswer": "4" },
            { "question": "Capital of France?", "options": ["Lyon", "Nice"], "correctAnswer": "Paris" }
        ]);
        let err = Artifact::from_value(ArtifactKind::Quiz, value).unwrap_err();
        assert!(err.to_string().contains("$[1].correctAnswer"), "got: {err}");
    }

    #[test]
    fn valid_quiz_keeps_order() {
        let value = json!([
            { "question": "first", "options": ["a", "b"], "correctAnswer": "b" },
            { "question": "second", "options": ["c", "d", "e"], "correctAnswer": "c" }
        ]);
        let Artifact::Quiz(quiz) = Artifact::from_value(ArtifactKind::Quiz, value).unwrap() else {
            panic!("expected a quiz");
        };
        assert_eq!(quiz[0].question, "first");
        assert!(quiz[1].is_correct("c"));
        assert!(!quiz[1].is_correct("d"));
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(json!(ArtifactKind::Flashcards), json!("flashcards"));
        assert_eq!(ArtifactKind::Quiz.to_string(), "quiz");
    }
}
