//! PDF Share Server Library
//!
//! Upload, list, view and delete PDF files whose bytes live in SQLite.
//! The server binary in main.rs wires these modules together; integration
//! tests build the same router over a temporary database.
//!
//! # Modules
//!
//! - `db`: Single-table file store (metadata plus base64 content)
//! - `upload`: Filename validation, stored name generation and persistence
//! - `routes`: HTTP handlers and the application router

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
pub mod upload;

pub use routes::app;
pub use state::AppState;
