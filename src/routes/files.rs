//! File listing, viewing and deletion routes

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::db::{FileRepository, FileSummary};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::upload::DEFAULT_MIME_TYPE;

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_files))
        .route("/view/:file_name", get(view_file))
        .route("/:id", delete(delete_file))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// GET /api/files
async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<FileSummary>>> {
    let files = FileRepository::new(state.db()).list().await?;
    tracing::debug!(count = files.len(), "Listed files");
    Ok(Json(files))
}

/// GET /api/files/view/:file_name
///
/// Serves the decoded bytes inline under the original file name.
async fn view_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response> {
    let file = FileRepository::new(state.db())
        .fetch_by_stored_name(&file_name)
        .await?
        .ok_or_else(|| {
            tracing::debug!(file_name = %file_name, "View of unknown file");
            AppError::NotFound("File not found".to_string())
        })?;

    let content_type = HeaderValue::from_str(&file.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MIME_TYPE));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file.data.len())
        .header(
            header::CONTENT_DISPOSITION,
            inline_disposition(&file.original_name),
        )
        .body(Body::from(file.data))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// DELETE /api/files/:id
async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let not_found = || AppError::NotFound("File not found".to_string());

    let id: i64 = id.parse().map_err(|_| not_found())?;
    let deleted = FileRepository::new(state.db()).delete(id).await?;

    if !deleted {
        return Err(not_found());
    }

    tracing::info!(id = id, "File deleted");
    Ok(Json(DeleteResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// `inline` disposition carrying the original name
///
/// The plain `filename` keeps printable ASCII only; the full name travels
/// percent-encoded in `filename*`.
fn inline_disposition(original_name: &str) -> String {
    let fallback: String = original_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == original_name {
        format!("inline; filename=\"{}\"", fallback)
    } else {
        format!(
            "inline; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(original_name)
        )
    }
}
