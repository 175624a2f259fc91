//! Upload route
//!
//! `POST /api/upload` accepts a single multipart field named `file`.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::upload::{is_pdf_filename, UploadService, UploadedFile, DEFAULT_MIME_TYPE};

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the upload router
pub fn router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD))
}

/// POST /api/upload
async fn upload_file(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedFile>> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected non-multipart upload: {}", e);
        AppError::InvalidInput("No file provided".to_string())
    })?;

    let max = state.max_file_size();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, max))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(AppError::InvalidInput("No file selected".to_string())),
        };

        if !is_pdf_filename(&original_name) {
            tracing::debug!(original_name = %original_name, "Rejected non-PDF upload");
            return Err(AppError::InvalidInput(
                "Only PDF files are allowed".to_string(),
            ));
        }

        let mime_type = field
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let data = read_limited(field, max).await?;

        let uploaded = UploadService::new(state.db())
            .store(&original_name, &mime_type, &data)
            .await?;

        return Ok(Json(uploaded));
    }

    tracing::debug!("No file field found in multipart upload");
    Err(AppError::InvalidInput("No file provided".to_string()))
}

/// Read a field to the end, failing as soon as it grows past `max` bytes
async fn read_limited(mut field: Field<'_>, max: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(|e| read_error(e, max))? {
        if data.len() + chunk.len() > max {
            tracing::debug!(max = max, "Upload exceeded size limit");
            return Err(AppError::TooLarge { max });
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

fn read_error(e: MultipartError, max: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::TooLarge { max }
    } else {
        AppError::InvalidInput(format!("Failed to read upload: {}", e.body_text()))
    }
}
