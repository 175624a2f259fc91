//! PDF upload handling
//!
//! Validates incoming files, derives the server-side stored name and persists
//! the content through the file repository.

pub mod naming;
pub mod service;

pub use naming::{is_pdf_filename, sanitize_stem, stored_name};
pub use service::{UploadService, UploadedFile};

/// Maximum file size: 10MB
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Content type recorded when the client does not send one
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";
