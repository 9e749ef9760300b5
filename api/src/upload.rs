use crate::error::ApiError;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use bytes::Bytes;

/// Name of the form field carrying the document.
pub const FILE_FIELD: &str = "file";

/// The document attached to a request.
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Pull the single `file` field out of a multipart form.
///
/// Other fields are drained and ignored. A `file` field without content
/// (what browsers send when nothing was picked) counts as no upload.
pub async fn read_single_file(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedFile, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        log::debug!("Not a multipart request: {}", rejection.body_text());
        ApiError::MissingUpload
    })?;

    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some(FILE_FIELD) {
            let _ = field.bytes().await.map_err(invalid_upload)?;
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(invalid_upload)?;

        if data.is_empty() {
            continue;
        }
        if file.is_some() {
            return Err(ApiError::MultipleUploads);
        }

        file = Some(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    file.ok_or(ApiError::MissingUpload)
}

fn invalid_upload(err: MultipartError) -> ApiError {
    ApiError::InvalidUpload {
        status: err.status(),
        reason: format!("Failed to read upload: {}", err.body_text()),
    }
}
