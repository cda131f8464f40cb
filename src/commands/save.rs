use super::{Output, json};
use crate::models::ConfigRecord;
use crate::prompt::{Prompter, is_yes};
use crate::reconcile::content_from_bytes;
use crate::storage::{DocumentBackend, RecordStore};
use crate::sys::FileMetadataProvider;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Arguments of `confr save`.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    pub name: String,
    pub path: PathBuf,
    pub tags: Vec<String>,
    /// Skip the unchanged-mtime check
    pub ignore_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    Replaced,
    Unchanged,
    Declined,
}

#[derive(Debug, Serialize)]
pub struct SaveResult {
    pub outcome: SaveOutcome,
    pub name: String,
    pub path: String,
}

impl Output for SaveResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match self.outcome {
            SaveOutcome::Saved | SaveOutcome::Replaced => "Saved!".to_string(),
            SaveOutcome::Unchanged => "File not changed. Ignoring".to_string(),
            SaveOutcome::Declined => "Not saved".to_string(),
        }
    }
}

/// Snapshot a file into the document.
///
/// A record is "found" when its name equals the requested name or its path
/// equals the absolute path. Replacing a found record moves it to the end.
pub fn save<B, P, M>(
    store: &mut RecordStore<B>,
    options: SaveOptions,
    prompter: &mut P,
    metadata: &M,
) -> Result<SaveResult>
where
    B: DocumentBackend,
    P: Prompter + ?Sized,
    M: FileMetadataProvider,
{
    let tags = normalize_tags(options.tags)?;

    let meta = metadata.metadata(&options.path).map_err(|e| {
        Error::Other(format!(
            "Error while checking file {}: {}",
            options.path.display(),
            e
        ))
    })?;
    if meta.is_dir {
        return Err(Error::InvalidInput(
            "Directories are not implemented".to_string(),
        ));
    }

    let path = std::path::absolute(&options.path)?
        .to_string_lossy()
        .to_string();
    let mut document = store.load()?;

    let mut replace_index = None;
    let found = document.find(|r| r.display_name == options.name || r.path == path);
    if let Some((index, existing)) = found {
        if !options.ignore_time && existing.last_modified == meta.modified {
            tracing::debug!(record = %existing.display_name, "mtime unchanged, not saving");
            return Ok(SaveResult {
                outcome: SaveOutcome::Unchanged,
                name: existing.display_name.clone(),
                path,
            });
        }

        prompter.say(&format!(
            "Found the following:\n  Name: {}\n  Size: {} bytes\n  Path: {}\n  Modified: {}",
            existing.display_name,
            existing.size(),
            existing.path,
            existing.last_modified.to_rfc3339()
        ))?;
        let answer = prompter.ask("Overwrite? (y/n) ")?;
        if !answer.as_deref().is_some_and(is_yes) {
            return Ok(SaveResult {
                outcome: SaveOutcome::Declined,
                name: options.name,
                path,
            });
        }
        replace_index = Some(index);
    }

    let content = content_from_bytes(&path, fs::read(&path)?);
    let record = ConfigRecord {
        display_name: options.name.clone(),
        path: path.clone(),
        tags,
        content,
        permission_encoding: meta.permission_encoding()?,
        last_modified: meta.modified,
    };

    if let Some(index) = replace_index {
        // The name and the path may have matched different records.
        let stale: Vec<usize> = document
            .records
            .iter()
            .enumerate()
            .filter(|(i, r)| *i == index || r.path == path)
            .map(|(i, _)| i)
            .collect();
        for i in stale.into_iter().rev() {
            document.remove(i);
        }
    }
    document.upsert(record, None);
    store.save(&document)?;
    tracing::info!(record = %options.name, %path, replaced = replace_index.is_some(), "record saved");

    Ok(SaveResult {
        outcome: if replace_index.is_some() {
            SaveOutcome::Replaced
        } else {
            SaveOutcome::Saved
        },
        name: options.name,
        path,
    })
}

/// Reject tags containing whitespace and drop duplicates, keeping order.
fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Err(Error::InvalidInput(format!(
                "Tags must be single words, got {:?}",
                tag
            )));
        }
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{memory_store, set_mtime, timestamp, write_file};
    use crate::prompt::ScriptedPrompter;
    use crate::sys::NativeMetadata;
    use tempfile::TempDir;

    fn options(name: &str, path: &std::path::Path) -> SaveOptions {
        SaveOptions {
            name: name.to_string(),
            path: path.to_path_buf(),
            tags: vec![],
            ignore_time: false,
        }
    }

    #[test]
    fn test_save_new_record() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp.path().join(".zshrc"), "export A=1\n", timestamp(0));
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let mut opts = options("zshrc", &path);
        opts.tags = vec!["linux".to_string(), "zsh".to_string(), "linux".to_string()];
        let result = save(&mut store, opts, &mut prompter, &NativeMetadata).unwrap();
        assert_eq!(result.outcome, SaveOutcome::Saved);
        assert_eq!(result.to_human(), "Saved!");

        let doc = store.load().unwrap();
        let record = &doc.records[0];
        assert_eq!(record.display_name, "zshrc");
        assert_eq!(record.path, path.to_string_lossy());
        assert_eq!(record.tags, vec!["linux", "zsh"]);
        assert_eq!(record.content, "export A=1\n");
        assert_eq!(record.last_modified, timestamp(0));
        assert!(record.permission_encoding.contains(' '));
    }

    #[test]
    fn test_save_unchanged_mtime_is_ignored() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp.path().join(".vimrc"), "set nu\n", timestamp(0));
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        save(&mut store, options("vimrc", &path), &mut prompter, &NativeMetadata).unwrap();
        let again = save(&mut store, options("vimrc", &path), &mut prompter, &NativeMetadata)
            .unwrap();

        assert_eq!(again.outcome, SaveOutcome::Unchanged);
        assert_eq!(again.to_human(), "File not changed. Ignoring");
        assert!(prompter.questions.is_empty());
    }

    #[test]
    fn test_save_unchanged_check_only_applies_to_found_record() {
        let temp = TempDir::new().unwrap();
        let a = write_file(&temp.path().join("a"), "a\n", timestamp(0));
        let b = write_file(&temp.path().join("b"), "b\n", timestamp(0));
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        save(&mut store, options("a", &a), &mut prompter, &NativeMetadata).unwrap();
        let result = save(&mut store, options("b", &b), &mut prompter, &NativeMetadata).unwrap();

        assert_eq!(result.outcome, SaveOutcome::Saved);
        assert_eq!(store.load().unwrap().records.len(), 2);
    }

    #[test]
    fn test_save_overwrite_moves_record_to_end() {
        let temp = TempDir::new().unwrap();
        let first = write_file(&temp.path().join("first"), "1\n", timestamp(0));
        let second = write_file(&temp.path().join("second"), "2\n", timestamp(0));
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(["y"]);

        save(&mut store, options("first", &first), &mut prompter, &NativeMetadata).unwrap();
        save(&mut store, options("second", &second), &mut prompter, &NativeMetadata).unwrap();

        fs::write(&first, "1 changed\n").unwrap();
        set_mtime(&first, timestamp(60));
        let result =
            save(&mut store, options("first", &first), &mut prompter, &NativeMetadata).unwrap();

        assert_eq!(result.outcome, SaveOutcome::Replaced);
        assert!(prompter.transcript[0].starts_with("Found the following:"));
        assert_eq!(prompter.questions, vec!["Overwrite? (y/n) "]);

        let doc = store.load().unwrap();
        let names: Vec<&str> = doc.records.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
        assert_eq!(doc.records[1].content, "1 changed\n");
        assert_eq!(doc.records[1].last_modified, timestamp(60));
    }

    #[test]
    fn test_save_overwrite_drops_other_record_on_same_path() {
        let temp = TempDir::new().unwrap();
        let a = write_file(&temp.path().join("a"), "a\n", timestamp(0));
        let b = write_file(&temp.path().join("b"), "b\n", timestamp(0));
        let c = write_file(&temp.path().join("c"), "c\n", timestamp(0));
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(["y"]);

        save(&mut store, options("a", &a), &mut prompter, &NativeMetadata).unwrap();
        save(&mut store, options("b", &b), &mut prompter, &NativeMetadata).unwrap();
        save(&mut store, options("c", &c), &mut prompter, &NativeMetadata).unwrap();

        set_mtime(&b, timestamp(60));
        let result = save(&mut store, options("a", &b), &mut prompter, &NativeMetadata).unwrap();
        assert_eq!(result.outcome, SaveOutcome::Replaced);

        let doc = store.load().unwrap();
        let records: Vec<(&str, &str)> = doc
            .records
            .iter()
            .map(|r| (r.display_name.as_str(), r.path.as_str()))
            .collect();
        let c_path = c.to_string_lossy();
        let b_path = b.to_string_lossy();
        assert_eq!(records, vec![("c", &*c_path), ("a", &*b_path)]);
        assert_eq!(doc.records[1].content, "b\n");
    }

    #[test]
    fn test_save_overwrite_declined() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp.path().join("f"), "old\n", timestamp(0));
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(["n"]);

        save(&mut store, options("f", &path), &mut prompter, &NativeMetadata).unwrap();
        fs::write(&path, "new\n").unwrap();
        set_mtime(&path, timestamp(5));

        let result = save(&mut store, options("f", &path), &mut prompter, &NativeMetadata).unwrap();
        assert_eq!(result.outcome, SaveOutcome::Declined);
        assert_eq!(store.load().unwrap().records[0].content, "old\n");
    }

    #[test]
    fn test_save_ignore_time_still_asks() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp.path().join("f"), "x\n", timestamp(0));
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(["yes"]);

        save(&mut store, options("f", &path), &mut prompter, &NativeMetadata).unwrap();
        let mut opts = options("renamed", &path);
        opts.ignore_time = true;
        let result = save(&mut store, opts, &mut prompter, &NativeMetadata).unwrap();

        assert_eq!(result.outcome, SaveOutcome::Replaced);
        let doc = store.load().unwrap();
        assert_eq!(doc.records.len(), 1);
        assert_eq!(doc.records[0].display_name, "renamed");
    }

    #[test]
    fn test_save_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let err = save(
            &mut store,
            options("ghost", &temp.path().join("ghost")),
            &mut prompter,
            &NativeMetadata,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Error while checking file"));
    }

    #[test]
    fn test_save_directory_rejected() {
        let temp = TempDir::new().unwrap();
        let mut store = memory_store();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let err = save(&mut store, options("dir", temp.path()), &mut prompter, &NativeMetadata)
            .unwrap_err();
        assert!(err.to_string().contains("Directories are not implemented"));
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(
            normalize_tags(vec!["a".into(), "arch-linux".into(), "a".into()]).unwrap(),
            vec!["a", "arch-linux"]
        );
        assert!(normalize_tags(vec!["two words".into()]).is_err());
        assert!(normalize_tags(vec![String::new()]).is_err());
    }
}
