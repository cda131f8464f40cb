use super::{Output, json};
use crate::Result;
use crate::storage::{DocumentBackend, RecordStore};
use crate::sys;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InitResult {
    pub owner: String,
    pub home_directory: String,
    pub location: String,
    pub records: usize,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Initialized confr store at {}\n  Owner: {}\n  Home: {}\n  Records: {}",
            self.location, self.owner, self.home_directory, self.records
        )
    }
}

/// Stamp the document with the current user and home directory.
///
/// Existing records are kept.
pub fn init<B: DocumentBackend>(store: &mut RecordStore<B>) -> Result<InitResult> {
    init_as(store, &sys::current_user(), &sys::home_directory())
}

fn init_as<B: DocumentBackend>(
    store: &mut RecordStore<B>,
    owner: &str,
    home_directory: &str,
) -> Result<InitResult> {
    let mut document = store.load()?;
    document.owner = owner.to_string();
    document.home_directory = home_directory.to_string();
    store.save(&document)?;

    Ok(InitResult {
        owner: document.owner,
        home_directory: document.home_directory,
        location: store.location(),
        records: document.records.len(),
    })
}
