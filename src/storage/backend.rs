//! Document backend trait and implementations.
//!
//! This module provides the places a confr document can live:
//! - `FileBackend` - A JSON file on disk (default `./conf.json`)
//! - `MemoryBackend` - An in-process buffer, for tests and dry runs

use crate::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Trait for backends that handle raw document persistence.
///
/// Backends move whole documents as text; parsing and serialization belong to
/// [`crate::storage::RecordStore`].
pub trait DocumentBackend {
    /// Read the full document text, or `None` if nothing is stored yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored document text.
    fn write(&mut self, contents: &str) -> Result<()>;

    /// Check whether a document is stored.
    fn exists(&self) -> bool;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;
}

/// Document stored as a file on disk.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document held in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: Option<String>,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            writes: 0,
        }
    }

    /// Current stored text.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl DocumentBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        self.contents = Some(contents.to_string());
        self.writes += 1;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.contents.is_some()
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
