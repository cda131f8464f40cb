//! Data models for confr documents.
//!
//! This module defines the persisted structures:
//! - `ConfigDocument` - The root document holding every tracked record
//! - `ConfigRecord` - One tracked file's snapshot (content + metadata)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root persisted object.
///
/// Record order is display order. No two records should share a `path`, but
/// that is enforced by the save workflow rather than by the document itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// User who created the document
    #[serde(default)]
    pub owner: String,

    /// Home directory of the owner (informational only)
    #[serde(default)]
    pub home_directory: String,

    /// Tracked files, in insertion order
    #[serde(default)]
    pub records: Vec<ConfigRecord>,
}

impl ConfigDocument {
    /// Create an empty document with no owner information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document owned by `owner`.
    pub fn with_owner(owner: impl Into<String>, home_directory: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            home_directory: home_directory.into(),
            records: Vec::new(),
        }
    }

    /// Return the first record (in document order) matching `predicate`.
    pub fn find<F>(&self, mut predicate: F) -> Option<(usize, &ConfigRecord)>
    where
        F: FnMut(&ConfigRecord) -> bool,
    {
        self.records.iter().enumerate().find(|(_, r)| predicate(*r))
    }

    /// Insert a record.
    ///
    /// With `replace_index`, the record at that index is removed and the new
    /// record is appended at the end; the original position is not kept.
    pub fn upsert(&mut self, record: ConfigRecord, replace_index: Option<usize>) {
        if let Some(index) = replace_index {
            if index < self.records.len() {
                self.records.remove(index);
            }
        }
        self.records.push(record);
    }

    /// Remove the record at `index`, returning it if it existed.
    pub fn remove(&mut self, index: usize) -> Option<ConfigRecord> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Number of tracked records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    /// User-chosen identifier (not necessarily unique)
    pub display_name: String,

    /// Absolute filesystem path
    pub path: String,

    /// Space-free tags, duplicate-free, in the order given
    #[serde(default)]
    pub tags: Vec<String>,

    /// File contents at the last save/update
    #[serde(default)]
    pub content: String,

    /// `"<user>:<group> <typechar><rwx>"`, see [`crate::permissions`]
    pub permission_encoding: String,

    /// Filesystem modification time at the last save/update
    pub last_modified: DateTime<Utc>,
}

impl ConfigRecord {
    /// Size of the stored content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// True if any tag equals `tag` exactly.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True if `search` is a substring of the path or display name, or an exact tag.
    pub fn matches_search(&self, search: &str) -> bool {
        self.path.contains(search) || self.display_name.contains(search) || self.has_tag(search)
    }
}
