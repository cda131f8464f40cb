//! Confr - A configuration file backup library.
//!
//! This library provides the core functionality for the `confr` CLI tool:
//! snapshotting files into a single document, reconciling those snapshots
//! with the live filesystem, and restoring, exporting or importing them.

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod permissions;
pub mod prompt;
pub mod reconcile;
pub mod selection;
pub mod storage;
pub mod sys;

/// Library-level error type for confr operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error parsing document at {location}: {source}")]
    CorruptDocument {
        location: String,
        source: serde_json::Error,
    },

    #[error("Malformed permission encoding: {0}")]
    MalformedEncoding(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not a valid save file: {0}")]
    InvalidSaveFile(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for confr operations.
pub type Result<T> = std::result::Result<T, Error>;
