use super::{Output, json};
use crate::Result;
use crate::storage::{DocumentBackend, RecordStore};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RmResult {
    /// Name of the removed record, if any
    pub removed: Option<String>,
}

impl Output for RmResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.removed {
            Some(name) => format!("Found: {}", name),
            None => "Nothing found".to_string(),
        }
    }
}

/// Remove the first record whose name contains `name`.
pub fn rm<B: DocumentBackend>(store: &mut RecordStore<B>, name: &str) -> Result<RmResult> {
    let mut document = store.load()?;

    let index = document
        .find(|r| r.display_name.contains(name))
        .map(|(index, _)| index);
    let removed = match index.and_then(|i| document.remove(i)) {
        Some(record) => {
            store.save(&document)?;
            tracing::info!(record = %record.display_name, "record removed");
            Some(record.display_name)
        }
        None => None,
    };

    Ok(RmResult { removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{memory_store, timestamp};
    use crate::models::{ConfigDocument, ConfigRecord};

    fn seeded(names: &[&str]) -> RecordStore<crate::storage::MemoryBackend> {
        let mut store = memory_store();
        let mut doc = ConfigDocument::new();
        for name in names {
            doc.upsert(
                ConfigRecord {
                    display_name: name.to_string(),
                    path: format!("/etc/{}", name),
                    tags: vec![],
                    content: String::new(),
                    permission_encoding: "root:root -rw-r--r--".to_string(),
                    last_modified: timestamp(0),
                },
                None,
            );
        }
        store.save(&doc).unwrap();
        store
    }

    #[test]
    fn test_rm_removes_first_substring_match() {
        let mut store = seeded(&["nginx-main", "nginx-site", "hosts"]);
        let result = rm(&mut store, "nginx").unwrap();

        assert_eq!(result.to_human(), "Found: nginx-main");
        let names: Vec<String> = store
            .load()
            .unwrap()
            .records
            .into_iter()
            .map(|r| r.display_name)
            .collect();
        assert_eq!(names, vec!["nginx-site", "hosts"]);
    }

    #[test]
    fn test_rm_nothing_found_leaves_store() {
        let mut store = seeded(&["hosts"]);
        let writes = store.backend().write_count();

        let result = rm(&mut store, "fstab").unwrap();
        assert_eq!(result.removed, None);
        assert_eq!(result.to_human(), "Nothing found");
        assert_eq!(store.backend().write_count(), writes);
    }
}
