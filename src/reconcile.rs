//! Drift detection and the update workflow.
//!
//! Every record is compared against its live file by modification time:
//!
//! 1. live file missing: skipped silently
//! 2. live mtime not newer than the snapshot: skipped
//! 3. live mtime newer: the operator decides (or auto-accept applies)
//! 4. accepted: content and mtime are re-read from disk
//!
//! Ownership and mode are only captured by `save`; an update never touches
//! `permission_encoding`.

use crate::models::{ConfigDocument, ConfigRecord};
use crate::prompt::{Prompter, is_yes};
use crate::sys::{FileMetadata, FileMetadataProvider};
use crate::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::io;
use std::path::Path;

/// How a record relates to its live file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// The live file does not exist
    Missing,
    /// The live file is not newer than the snapshot
    Unchanged,
    /// The live file was modified after the snapshot
    NewerOnDisk { modified: DateTime<Utc> },
    /// The live file could not be inspected
    Unreadable(String),
}

/// Classify a record given the result of statting its live file.
pub fn classify(record: &ConfigRecord, live: io::Result<FileMetadata>) -> Drift {
    match live {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Drift::Missing,
        Err(e) => Drift::Unreadable(e.to_string()),
        Ok(meta) if meta.modified > record.last_modified => Drift::NewerOnDisk {
            modified: meta.modified,
        },
        Ok(_) => Drift::Unchanged,
    }
}

/// States of the per-record decision loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    AwaitingDecision,
    ShowDiff,
    Accepted,
    Rejected,
}

impl DecisionState {
    /// Transition out of `AwaitingDecision` for an operator answer.
    ///
    /// `None` means input ended; that never accepts.
    pub fn from_answer(answer: Option<&str>) -> Self {
        match answer.map(str::trim) {
            None => Self::Rejected,
            Some(a) if a.eq_ignore_ascii_case("c") => Self::ShowDiff,
            Some(a) if a.is_empty() || is_yes(a) => Self::Accepted,
            Some(_) => Self::Rejected,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// Ask the operator whether to take the newer live file for `record`.
///
/// Choosing `c` shows a diff and asks again; the loop only ends in
/// [`DecisionState::Accepted`] or [`DecisionState::Rejected`].
pub fn decide<P: Prompter + ?Sized>(record: &ConfigRecord, prompter: &mut P) -> Result<DecisionState> {
    let question = format!(
        "{} ({}) is newer in fs. Update? [Ync] ",
        record.display_name, record.path
    );

    let mut state = DecisionState::AwaitingDecision;
    while !state.is_terminal() {
        state = match state {
            DecisionState::AwaitingDecision => {
                let answer = prompter.ask(&question)?;
                DecisionState::from_answer(answer.as_deref())
            }
            DecisionState::ShowDiff => {
                match std::fs::read(&record.path) {
                    Ok(bytes) => {
                        let live = String::from_utf8_lossy(&bytes);
                        prompter.say(&render_diff(&record.content, &live))?;
                    }
                    Err(e) => prompter.say(&format!("Couldn't read file: {}", e))?,
                }
                DecisionState::AwaitingDecision
            }
            terminal => terminal,
        };
    }

    tracing::debug!(record = %record.display_name, ?state, "update decision");
    Ok(state)
}

/// Render a line diff from the stored snapshot to the live content.
pub fn render_diff(stored: &str, live: &str) -> String {
    let diff = TextDiff::from_lines(stored, live);
    let mut output = String::new();

    output.push_str(&format!("{}\n", "--- stored".red()));
    output.push_str(&format!("{}\n", "+++ disk".green()));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let value = change.value().trim_end_matches('\n');
                let line = match change.tag() {
                    ChangeTag::Delete => format!("-{}", value).red().to_string(),
                    ChangeTag::Insert => format!("+{}", value).green().to_string(),
                    ChangeTag::Equal => format!(" {}", value),
                };
                output.push_str(&line);
                output.push('\n');
            }
        }
    }

    if stored == live {
        output.push_str("(no content changes)\n");
    }

    output
}

/// A record that could not be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecord {
    pub name: String,
    pub error: String,
}

/// What an update pass did to each record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub missing: Vec<String>,
    pub rejected: Vec<String>,
    pub failed: Vec<FailedRecord>,
}

impl UpdateReport {
    /// True if any record was modified.
    pub fn changed(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// Drives the update workflow over a document.
pub struct Reconciler<'a, M: FileMetadataProvider> {
    metadata: &'a M,
    auto_accept: bool,
}

impl<'a, M: FileMetadataProvider> Reconciler<'a, M> {
    pub fn new(metadata: &'a M, auto_accept: bool) -> Self {
        Self {
            metadata,
            auto_accept,
        }
    }

    /// Visit every record in document order, updating accepted ones in place.
    ///
    /// Per-record failures are reported and recorded; they never abort the
    /// pass. The caller persists the document afterwards.
    pub fn run<P: Prompter + ?Sized>(
        &self,
        document: &mut ConfigDocument,
        prompter: &mut P,
    ) -> Result<UpdateReport> {
        let mut report = UpdateReport::default();

        for record in document.records.iter_mut() {
            let name = record.display_name.clone();
            let live = self.metadata.metadata(Path::new(&record.path));

            let modified = match classify(record, live) {
                Drift::Missing => {
                    tracing::debug!(record = %name, path = %record.path, "live file missing, skipping");
                    report.missing.push(name);
                    continue;
                }
                Drift::Unchanged => {
                    report.unchanged.push(name);
                    continue;
                }
                Drift::Unreadable(error) => {
                    tracing::warn!(record = %name, %error, "could not stat live file");
                    prompter.say(&format!("Couldn't check {}: {}", record.path, error))?;
                    report.failed.push(FailedRecord { name, error });
                    continue;
                }
                Drift::NewerOnDisk { modified } => modified,
            };

            if self.auto_accept {
                prompter.say(&format!(
                    "{} ({}) is newer in fs. Updating",
                    record.display_name, record.path
                ))?;
            } else if decide(record, prompter)? == DecisionState::Rejected {
                report.rejected.push(name);
                continue;
            }

            match apply_update(record, modified) {
                Ok(()) => report.updated.push(name),
                Err(e) => {
                    tracing::warn!(record = %name, error = %e, "could not read live file");
                    prompter.say(&format!("Couldn't read file: {}", e))?;
                    report.failed.push(FailedRecord {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Replace a record's content and mtime with the live file's.
fn apply_update(record: &mut ConfigRecord, modified: DateTime<Utc>) -> io::Result<()> {
    let bytes = std::fs::read(&record.path)?;
    record.content = content_from_bytes(&record.path, bytes);
    record.last_modified = modified;
    Ok(())
}

/// Convert file bytes to stored text, replacing invalid UTF-8.
pub fn content_from_bytes(path: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path, "file is not valid UTF-8, storing lossy copy");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
