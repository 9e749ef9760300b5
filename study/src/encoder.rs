//! Turns a document (file path or uploaded buffer) into the inline payload
//! the model API expects: raw bytes plus a MIME type, base64 encoded.

use crate::error::GenerationError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use std::path::{Path, PathBuf};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Where the document bytes come from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Buffer(Bytes),
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        DocumentSource::Path(path)
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        DocumentSource::Path(path.to_path_buf())
    }
}

impl From<Bytes> for DocumentSource {
    fn from(bytes: Bytes) -> Self {
        DocumentSource::Buffer(bytes)
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Buffer(Bytes::from(bytes))
    }
}

#[derive(Debug, Clone)]
pub struct DocumentPayload {
    bytes: Bytes,
    mime_type: String,
    encoded: String,
}

impl DocumentPayload {
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Standard, padded base64 of the document bytes.
    pub fn base64(&self) -> &str {
        &self.encoded
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Load (when given a path) and base64-encode a document.
///
/// A path is read fully into memory in one go; a buffer is used as is.
pub async fn encode(
    source: impl Into<DocumentSource>,
    mime_type: &str,
) -> Result<DocumentPayload, GenerationError> {
    check_mime_type(mime_type)?;

    let bytes = match source.into() {
        DocumentSource::Path(path) => read_path(&path).await?,
        DocumentSource::Buffer(bytes) => bytes,
    };

    if bytes.is_empty() {
        return Err(GenerationError::invalid_input("document is empty"));
    }

    let encoded = STANDARD.encode(&bytes);
    log::debug!(
        "Encoded {} bytes of {} into {} base64 chars",
        bytes.len(),
        mime_type,
        encoded.len()
    );

    Ok(DocumentPayload {
        bytes,
        mime_type: mime_type.to_string(),
        encoded,
    })
}

async fn read_path(path: &Path) -> Result<Bytes, GenerationError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| GenerationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    if !metadata.is_file() {
        return Err(GenerationError::invalid_input(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }

    let data = tokio::fs::read(path)
        .await
        .map_err(|source| GenerationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Bytes::from(data))
}

fn check_mime_type(mime_type: &str) -> Result<(), GenerationError> {
    let valid = match mime_type.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty() && !subtype.is_empty() && !mime_type.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(GenerationError::invalid_input(format!(
            "'{mime_type}' is not a MIME type"
        )))
    }
}

/// Pick the MIME type to declare for an uploaded document.
///
/// An explicit, non-generic content type wins. Without one the document must
/// look like a PDF, by its magic bytes or a `.pdf` extension.
pub fn resolve_mime_type(
    declared: Option<&str>,
    file_name: Option<&str>,
    data: &[u8],
) -> Result<String, GenerationError> {
    if let Some(declared) = declared.map(str::trim) {
        if !declared.is_empty() && declared != "application/octet-stream" {
            return Ok(declared.to_string());
        }
    }

    let pdf_name = file_name.is_some_and(|name| name.to_lowercase().ends_with(".pdf"));
    if data.starts_with(b"%PDF-") || pdf_name {
        return Ok(PDF_MIME_TYPE.to_string());
    }

    Err(GenerationError::invalid_input(format!(
        "cannot tell the type of '{}'; upload a PDF or send a content type",
        file_name.unwrap_or("<unnamed>")
    )))
}
