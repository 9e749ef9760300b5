use crate::error::ApiError;
use crate::responses::{AnalyseResponse, ArtifactResponse, HealthResponse};
use crate::state::AppState;
use crate::upload::read_single_file;
use axum::body::Body;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::TryStreamExt;
use serde::Deserialize;
use std::sync::Arc;
use study_system::{encode, resolve_mime_type, ArtifactKind, ErrorResponse, PDF_MIME_TYPE};
use uuid::Uuid;

type Upload = Result<Multipart, MultipartRejection>;

pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Upload,
) -> Result<Json<ArtifactResponse>, ApiError> {
    generate_from_upload(&state, ArtifactKind::Summary, multipart).await
}

pub async fn generate_flashcards(
    State(state): State<Arc<AppState>>,
    multipart: Upload,
) -> Result<Json<ArtifactResponse>, ApiError> {
    generate_from_upload(&state, ArtifactKind::Flashcards, multipart).await
}

pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    multipart: Upload,
) -> Result<Json<ArtifactResponse>, ApiError> {
    generate_from_upload(&state, ArtifactKind::Quiz, multipart).await
}

async fn generate_from_upload(
    state: &AppState,
    kind: ArtifactKind,
    multipart: Upload,
) -> Result<Json<ArtifactResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let file = read_single_file(multipart).await?;

    let mime_type = resolve_mime_type(
        file.content_type.as_deref(),
        file.file_name.as_deref(),
        &file.data,
    )?;
    log::info!(
        "[{}] {} requested for '{}' ({} bytes, {})",
        request_id,
        kind,
        file.file_name.as_deref().unwrap_or("<unnamed>"),
        file.data.len(),
        mime_type
    );

    let payload = encode(file.data, &mime_type).await?;
    let artifact = state.client.generate(kind, &payload).await.map_err(|e| {
        log::error!("[{}] {} generation failed: {}", request_id, kind, e);
        e
    })?;

    log::info!("[{}] {} ready", request_id, kind);
    Ok(Json(artifact.into()))
}

/// Summarizes the document configured at startup instead of an upload.
pub async fn summarize_legacy(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ArtifactResponse>, ApiError> {
    let path = state
        .legacy_document_path
        .as_deref()
        .ok_or(ApiError::NotConfigured("LEGACY_DOCUMENT_PATH"))?;

    log::info!("Summarizing configured document {}", path.display());

    let payload = encode(path, PDF_MIME_TYPE).await?;
    let artifact = state.client.generate(ArtifactKind::Summary, &payload).await?;

    Ok(Json(artifact.into()))
}

#[derive(Debug, Deserialize)]
pub struct AnalyseParams {
    pub stream: Option<bool>,
}

/// Free-text exploration of the configured prompt, streamed as plain text
/// unless `?stream=false`.
pub async fn analyse(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AnalyseParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let chunks = state.client.stream(&state.analyse_prompt).await?;

    if params.stream.unwrap_or(true) {
        let body = Body::from_stream(chunks.inspect_err(|e| {
            log::error!("Stream interrupted: {}", e);
        }));
        return Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response());
    }

    let summary: String = chunks.try_collect::<Vec<String>>().await?.concat();
    Ok(Json(AnalyseResponse { summary }).into_response())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not found")))
}
