use super::{Output, json};
use crate::Result;
use crate::prompt::Prompter;
use crate::reconcile::{Reconciler, UpdateReport};
use crate::storage::{DocumentBackend, RecordStore};
use crate::sys::FileMetadataProvider;
use serde::Serialize;

/// Arguments of `confr update`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Accept every newer live file without asking
    pub yes: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdateResult {
    #[serde(flatten)]
    pub report: UpdateReport,
}

impl Output for UpdateResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        "Done!".to_string()
    }
}

/// Refresh every record whose live file is newer, then persist once.
pub fn update<B, P, M>(
    store: &mut RecordStore<B>,
    options: UpdateOptions,
    prompter: &mut P,
    metadata: &M,
) -> Result<UpdateResult>
where
    B: DocumentBackend,
    P: Prompter + ?Sized,
    M: FileMetadataProvider,
{
    let mut document = store.load()?;
    let report = Reconciler::new(metadata, options.yes).run(&mut document, prompter)?;
    store.save(&document)?;

    tracing::info!(
        updated = report.updated.len(),
        rejected = report.rejected.len(),
        failed = report.failed.len(),
        "update pass finished"
    );
    Ok(UpdateResult { report })
}
