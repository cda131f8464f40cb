use super::{Output, json};
use crate::Result;
use crate::archive::{self, ImportSource};
use crate::prompt::Prompter;
use crate::storage::{DocumentBackend, RecordStore};
use serde::Serialize;
use std::path::PathBuf;

/// Asked before an import replaces an existing store.
pub const OVERWRITE_STORE_QUESTION: &str = "You already have confr initialized!\nRunning this command will rewrite current db, continue? [yN] ";

/// Arguments of `confr export`.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Artifact path; the configured export path when `None`
    pub output: Option<PathBuf>,
    pub compression_level: i32,
}

#[derive(Debug, Serialize)]
pub struct ExportResult {
    pub path: String,
    pub records: usize,
    pub bytes: usize,
}

impl Output for ExportResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Exported {} files to {}", self.records, self.path)
    }
}

/// Write the whole document to a compressed artifact.
pub fn export<B: DocumentBackend>(
    store: &mut RecordStore<B>,
    options: ExportOptions,
    default_path: PathBuf,
) -> Result<ExportResult> {
    let document = store.load()?;
    let path = options.output.unwrap_or(default_path);

    let bytes = archive::pack(&document, options.compression_level)?;
    archive::write_artifact(&path, &bytes)?;
    tracing::info!(path = %path.display(), records = document.records.len(), "exported");

    Ok(ExportResult {
        path: path.display().to_string(),
        records: document.records.len(),
        bytes: bytes.len(),
    })
}

/// Arguments of `confr import`.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Local path or http(s) URL; the configured export path when `None`
    pub source: Option<String>,
    /// Replace an existing store without asking
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub source: String,
    pub imported: usize,
    pub cancelled: bool,
}

impl Output for ImportResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.cancelled {
            "Import cancelled".to_string()
        } else {
            format!("Imported {} files", self.imported)
        }
    }
}

/// Replace the store with the document inside an artifact.
///
/// The store is only written once the artifact has been fetched and decoded.
pub fn import<B, P>(
    store: &mut RecordStore<B>,
    options: ImportOptions,
    default_path: PathBuf,
    prompter: &mut P,
) -> Result<ImportResult>
where
    B: DocumentBackend,
    P: Prompter + ?Sized,
{
    let source = ImportSource::parse(options.source.as_deref(), &default_path);

    if store.exists() && !options.force {
        let answer = prompter.ask(OVERWRITE_STORE_QUESTION)?;
        let proceed = answer
            .map(|a| a.trim().to_lowercase().starts_with('y'))
            .unwrap_or(false);
        if !proceed {
            return Ok(ImportResult {
                source: source.to_string(),
                imported: 0,
                cancelled: true,
            });
        }
    }

    let bytes = source.fetch()?;
    let document = archive::unpack(&bytes)?;
    store.save(&document)?;
    tracing::info!(%source, records = document.records.len(), "imported");

    Ok(ImportResult {
        source: source.to_string(),
        imported: document.records.len(),
        cancelled: false,
    })
}
