//! Command implementations for the confr CLI.
//!
//! This module contains the business logic for each CLI command:
//! - `ls` - List saved records
//! - `save` - Snapshot a file into the document
//! - `rm` - Remove a record
//! - `init` - Record owner and home directory
//! - `restore` - Write selected snapshots back to disk
//! - `update` - Refresh snapshots whose live file is newer
//! - `export` / `import` - Compressed artifacts
//!
//! Handlers take the store, a [`Prompter`](crate::prompt::Prompter) for any
//! interaction and a [`FileMetadataProvider`](crate::sys::FileMetadataProvider)
//! for stat calls, and return a result implementing [`Output`].

mod init;
mod list;
mod remove;
mod restore;
mod save;
mod transfer;
mod update;

pub use init::{InitResult, init};
pub use list::{LsResult, RecordSummary, ls};
pub use remove::{RmResult, rm};
pub use restore::{RestoreOptions, RestoreResult, restore};
pub use save::{SaveOptions, SaveOutcome, SaveResult, save};
pub use transfer::{
    ExportOptions, ExportResult, ImportOptions, ImportResult, export, import,
    OVERWRITE_STORE_QUESTION,
};
pub use update::{UpdateOptions, UpdateResult, update};

use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Compact JSON for a serializable result.
pub(crate) fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}
