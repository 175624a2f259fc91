//! Persisting validated uploads

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::naming::stored_name;
use crate::db::{FileRepository, NewFile};
use crate::error::{AppError, Result};

/// Attempts at finding a free stored name before giving up
const MAX_NAME_ATTEMPTS: usize = 3;

/// Upload response body
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub id: i64,
    pub original_name: String,
    pub file_name: String,
    pub file_size: usize,
    pub url: String,
}

/// Stores validated PDF uploads under a fresh stored name
pub struct UploadService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UploadService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a file named with the current time
    pub async fn store(
        &self,
        original_name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<UploadedFile> {
        self.store_at(original_name, mime_type, data, Utc::now().timestamp_millis())
            .await
    }

    /// Store a file named with the given millisecond timestamp
    ///
    /// A name already taken (same stem within the same millisecond) is retried
    /// with a random suffix on the stem.
    pub async fn store_at(
        &self,
        original_name: &str,
        mime_type: &str,
        data: &[u8],
        timestamp_ms: i64,
    ) -> Result<UploadedFile> {
        let repo = FileRepository::new(self.pool);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let suffix = (attempt > 0).then(|| {
                let id = Uuid::new_v4().simple().to_string();
                id[..8].to_string()
            });
            let file_name = stored_name(original_name, timestamp_ms, suffix.as_deref());

            let inserted = repo
                .insert(&NewFile {
                    original_name,
                    file_name: &file_name,
                    mime_type,
                    data,
                })
                .await;

            match inserted {
                Ok(id) => {
                    tracing::info!(
                        id = id,
                        original_name = %original_name,
                        file_name = %file_name,
                        size = data.len(),
                        "File stored"
                    );

                    return Ok(UploadedFile {
                        id,
                        original_name: original_name.to_string(),
                        url: format!("/api/files/view/{}", file_name),
                        file_name,
                        file_size: data.len(),
                    });
                }
                Err(AppError::Conflict(name)) => {
                    tracing::warn!(file_name = %name, attempt = attempt + 1, "Stored name collision");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Internal(format!(
            "No free stored name for {:?} after {} attempts",
            original_name, MAX_NAME_ATTEMPTS
        )))
    }
}
