use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use study_system::{ErrorResponse, GenerationError};

#[derive(Debug)]
pub enum ApiError {
    MissingUpload,
    MultipleUploads,
    InvalidUpload { status: StatusCode, reason: String },
    InvalidQuery { status: StatusCode, reason: String },
    NotConfigured(&'static str),
    Generation(GenerationError),
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        ApiError::Generation(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery {
            status: rejection.status(),
            reason: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::MissingUpload => (StatusCode::BAD_REQUEST, "No file uploaded".to_string()),
            ApiError::MultipleUploads => (
                StatusCode::BAD_REQUEST,
                "Only one file can be uploaded per request".to_string(),
            ),
            ApiError::InvalidUpload { status, reason }
            | ApiError::InvalidQuery { status, reason } => (*status, reason.clone()),
            ApiError::NotConfigured(what) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{} is not configured", what),
            ),
            ApiError::Generation(err) => match err {
                GenerationError::InvalidInputKind { reason } => {
                    (StatusCode::BAD_REQUEST, format!("Invalid document: {}", reason))
                }
                GenerationError::Io { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read the document".to_string(),
                ),
                GenerationError::ExternalCallFailure(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error while generating content".to_string(),
                ),
                GenerationError::MalformedResponse { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The model response is not valid JSON".to_string(),
                ),
                GenerationError::IncompleteResult { kind, reason } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("The generated {} is incomplete: {}", kind, reason),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            match &self {
                ApiError::Generation(err) => log::error!("Request failed: {}", err),
                other => log::error!("Request failed: {:?}", other),
            }
        } else {
            log::warn!("Rejected request: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
