use super::{Output, json};
use crate::models::ConfigRecord;
use crate::permissions;
use crate::prompt::{Prompter, is_yes};
use crate::reconcile::{Drift, classify};
use crate::selection;
use crate::storage::{DocumentBackend, RecordStore};
use crate::sys::FileMetadataProvider;
use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Arguments of `confr restore`.
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub search: String,
    /// Overwrite live files without asking, even when they are newer
    pub force: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct RestoreResult {
    /// Number of records matching the search
    pub candidates: usize,
    /// Paths written
    pub restored: Vec<String>,
    /// Paths left alone because the operator kept the newer live file
    pub kept: Vec<String>,
}

impl Output for RestoreResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.candidates == 0 {
            return "Nothing found".to_string();
        }
        if self.restored.is_empty() {
            return "Nothing restored".to_string();
        }
        self.restored.join("\n")
    }
}

/// List matching records, read a selection and write the chosen ones back.
pub fn restore<B, P, M>(
    store: &mut RecordStore<B>,
    options: RestoreOptions,
    prompter: &mut P,
    metadata: &M,
) -> Result<RestoreResult>
where
    B: DocumentBackend,
    P: Prompter + ?Sized,
    M: FileMetadataProvider,
{
    let document = store.load()?;
    let candidates: Vec<&ConfigRecord> = document
        .records
        .iter()
        .filter(|r| r.matches_search(&options.search))
        .collect();

    let mut result = RestoreResult {
        candidates: candidates.len(),
        ..Default::default()
    };
    if candidates.is_empty() {
        return Ok(result);
    }

    for (i, record) in candidates.iter().enumerate() {
        prompter.say(&format!("{}: {} {}", i + 1, record.display_name, record.path))?;
    }

    let Some(answer) = prompter.ask("Select configs to restore: ")? else {
        return Ok(result);
    };
    let selected = match selection::try_parse(&answer) {
        Ok(selected) => selected,
        Err(e) => {
            prompter.say(&e.to_string())?;
            return Ok(result);
        }
    };

    for index in selected {
        let Some(record) = index.checked_sub(1).and_then(|i| candidates.get(i)) else {
            prompter.say(&format!("No config at position {}, skipping", index))?;
            continue;
        };

        if !options.force && !confirm_overwrite(record, prompter, metadata)? {
            result.kept.push(record.path.clone());
            continue;
        }

        write_record(record)?;
        tracing::info!(record = %record.display_name, path = %record.path, "record restored");
        result.restored.push(record.path.clone());
    }

    Ok(result)
}

/// Ask before replacing a live file that changed after the snapshot.
fn confirm_overwrite<P, M>(record: &ConfigRecord, prompter: &mut P, metadata: &M) -> Result<bool>
where
    P: Prompter + ?Sized,
    M: FileMetadataProvider,
{
    match classify(record, metadata.metadata(Path::new(&record.path))) {
        Drift::NewerOnDisk { .. } => {
            let answer = prompter.ask(&format!(
                "{} ({}) is newer in fs than the saved copy. Overwrite? [yN] ",
                record.display_name, record.path
            ))?;
            Ok(answer.as_deref().is_some_and(is_yes))
        }
        _ => Ok(true),
    }
}

/// Write a record's content to its path and apply its mode.
///
/// Ownership is not reapplied.
fn write_record(record: &ConfigRecord) -> Result<()> {
    let permission = permissions::decode(&record.permission_encoding)?;
    let path = Path::new(&record.path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if path.exists() {
        make_writable(path)?;
    }
    fs::write(path, &record.content)?;
    apply_mode(path, permission.unix_mode())?;
    Ok(())
}

/// Give the owner write access so a read-only snapshot can be restored again.
#[cfg(unix)]
fn make_writable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path)?.permissions().mode();
    if mode & 0o200 == 0 {
        fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o200))?;
    }
    Ok(())
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, perms)?;
    Ok(())
}
