//! Storage layer for confr documents.
//!
//! The whole [`ConfigDocument`] is read on every command that needs state and
//! rewritten in full on every mutating command. There is no locking: two
//! concurrent invocations race and the last writer wins.
//!
//! ## Backends
//!
//! - **File backend** (default): pretty-printed JSON at `./conf.json` or the
//!   configured store path
//! - **Memory backend**: used by tests

pub mod backend;

pub use backend::{DocumentBackend, FileBackend, MemoryBackend};

use crate::models::ConfigDocument;
use crate::{Error, Result};
use std::path::Path;

/// Default document location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "./conf.json";

/// Loads and persists the document through a backend.
pub struct RecordStore<B: DocumentBackend = FileBackend> {
    backend: B,
}

impl RecordStore<FileBackend> {
    /// Open a store backed by the JSON file at `path`.
    pub fn open(path: &Path) -> Self {
        Self::new(FileBackend::new(path))
    }
}

impl<B: DocumentBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Check whether a document has been persisted.
    pub fn exists(&self) -> bool {
        self.backend.exists()
    }

    /// Human-readable location of the document.
    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Load the document.
    ///
    /// A missing document is not an error: an empty one is created, persisted
    /// and returned. A document that exists but does not parse is an error.
    pub fn load(&mut self) -> Result<ConfigDocument> {
        match self.backend.read()? {
            Some(text) => parse_document(&text).map_err(|source| Error::CorruptDocument {
                location: self.backend.location(),
                source,
            }),
            None => {
                tracing::info!(location = %self.backend.location(), "document not found, creating new");
                let document = ConfigDocument::new();
                self.save(&document)?;
                Ok(document)
            }
        }
    }

    /// Persist the whole document, replacing whatever was stored.
    pub fn save(&mut self, document: &ConfigDocument) -> Result<()> {
        let text = serde_json::to_string_pretty(document)?;
        self.backend.write(&text)?;
        tracing::debug!(
            location = %self.backend.location(),
            records = document.records.len(),
            "document saved"
        );
        Ok(())
    }
}

/// Parse document text.
pub fn parse_document(text: &str) -> std::result::Result<ConfigDocument, serde_json::Error> {
    serde_json::from_str(text)
}
