//! Uploaded file database operations

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// File metadata as listed by the API (content excluded)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileSummary {
    pub id: i64,
    pub original_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub upload_time: String,
}

/// A new row to persist
#[derive(Debug, Clone)]
pub struct NewFile<'a> {
    pub original_name: &'a str,
    pub file_name: &'a str,
    pub mime_type: &'a str,
    pub data: &'a [u8],
}

/// Decoded file content with what is needed to serve it
#[derive(Debug, Clone)]
pub struct FileContent {
    pub original_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(sqlx::FromRow)]
struct EncodedFileRow {
    original_name: String,
    mime_type: String,
    file_data: String,
}

/// Uploaded file repository
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a file and return its id
    ///
    /// Fails with `AppError::Conflict` when `file_name` is already taken.
    pub async fn insert(&self, file: &NewFile<'_>) -> Result<i64> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let encoded = BASE64.encode(file.data);

        let result = sqlx::query(
            r#"
            INSERT INTO uploaded_files (original_name, file_name, file_size, mime_type, upload_time, file_data)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(file.original_name)
        .bind(file.file_name)
        .bind(file.data.len() as i64)
        .bind(file.mime_type)
        .bind(&now)
        .bind(&encoded)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(file.file_name.to_string())
            }
            other => AppError::Database(other),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// List all files, most recent first
    pub async fn list(&self) -> Result<Vec<FileSummary>> {
        let files = sqlx::query_as::<_, FileSummary>(
            r#"
            SELECT id, original_name, file_name, file_size, mime_type, upload_time
            FROM uploaded_files
            ORDER BY upload_time DESC, id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// Fetch and decode a file by its stored name
    pub async fn fetch_by_stored_name(&self, file_name: &str) -> Result<Option<FileContent>> {
        let row = sqlx::query_as::<_, EncodedFileRow>(
            r#"
            SELECT original_name, mime_type, file_data
            FROM uploaded_files
            WHERE file_name = ?
            "#,
        )
        .bind(file_name)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(FileContent {
            original_name: row.original_name,
            mime_type: row.mime_type,
            data: BASE64.decode(row.file_data.as_bytes())?,
        }))
    }

    /// Delete a file by id, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM uploaded_files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    fn new_file<'a>(file_name: &'a str, data: &'a [u8]) -> NewFile<'a> {
        NewFile {
            original_name: "Report Q3.pdf",
            file_name,
            mime_type: "application/pdf",
            data,
        }
    }

    #[tokio::test]
    async fn test_insert_then_fetch_returns_identical_bytes() {
        let pool = create_memory_pool().await.unwrap();
        let repo = FileRepository::new(&pool);

        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let id = repo.insert(&new_file("1_report.pdf", &data)).await.unwrap();
        assert!(id > 0);

        let content = repo.fetch_by_stored_name("1_report.pdf").await.unwrap().unwrap();
        assert_eq!(content.data, data);
        assert_eq!(content.original_name, "Report Q3.pdf");
        assert_eq!(content.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_size_matches_decoded_content() {
        let pool = create_memory_pool().await.unwrap();
        let repo = FileRepository::new(&pool);

        repo.insert(&new_file("1_a.pdf", b"%PDF-1.4 tiny")).await.unwrap();

        let files = repo.list().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_size, b"%PDF-1.4 tiny".len() as i64);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let pool = create_memory_pool().await.unwrap();
        let repo = FileRepository::new(&pool);

        let first = repo.insert(&new_file("1_a.pdf", b"a")).await.unwrap();
        let second = repo.insert(&new_file("2_b.pdf", b"b")).await.unwrap();
        let third = repo.insert(&new_file("3_c.pdf", b"c")).await.unwrap();

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let pool = create_memory_pool().await.unwrap();
        let repo = FileRepository::new(&pool);

        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.fetch_by_stored_name("missing.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_stored_name_is_conflict() {
        let pool = create_memory_pool().await.unwrap();
        let repo = FileRepository::new(&pool);

        repo.insert(&new_file("1_same.pdf", b"one")).await.unwrap();
        let result = repo.insert(&new_file("1_same.pdf", b"two")).await;

        assert!(matches!(result, Err(AppError::Conflict(name)) if name == "1_same.pdf"));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_rows() {
        let pool = create_memory_pool().await.unwrap();
        let repo = FileRepository::new(&pool);

        let id = repo.insert(&new_file("1_gone.pdf", b"x")).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(!repo.delete(9999).await.unwrap());
        assert!(repo.fetch_by_stored_name("1_gone.pdf").await.unwrap().is_none());
    }
}
