use super::{Output, json};
use crate::Result;
use crate::models::ConfigRecord;
use crate::storage::{DocumentBackend, RecordStore};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;

/// A record as shown by `ls`, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub name: String,
    pub path: String,
    pub tags: Vec<String>,
    pub size: usize,
    pub last_modified: DateTime<Utc>,
}

impl From<&ConfigRecord> for RecordSummary {
    fn from(record: &ConfigRecord) -> Self {
        Self {
            name: record.display_name.clone(),
            path: record.path.clone(),
            tags: record.tags.clone(),
            size: record.size(),
            last_modified: record.last_modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LsResult {
    pub records: Vec<RecordSummary>,
    #[serde(skip)]
    pub extra: bool,
}

impl Output for LsResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.records.is_empty() {
            return "No configs saved".to_string();
        }

        let lines: Vec<String> = self
            .records
            .iter()
            .map(|r| {
                let tags = r.tags.join(" ");
                if self.extra {
                    format!(
                        "{}:\n  Tags: {}\n  Size: {} bytes\n  Path: {}\n  Modified: {}",
                        r.name.blue(),
                        tags,
                        r.size,
                        r.path,
                        r.last_modified.to_rfc3339_opts(SecondsFormat::AutoSi, true)
                    )
                } else {
                    format!("{} ({}) {}", r.name.blue(), tags.bright_black(), r.path)
                }
            })
            .collect();
        lines.join("\n")
    }
}

/// List every record in document order.
pub fn ls<B: DocumentBackend>(store: &mut RecordStore<B>, extra: bool) -> Result<LsResult> {
    let document = store.load()?;
    Ok(LsResult {
        records: document.records.iter().map(RecordSummary::from).collect(),
        extra,
    })
}
