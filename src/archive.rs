//! Portable export/import artifacts.
//!
//! An artifact is the document serialized as compact JSON and compressed with
//! zstd. Import reads one from a local file or over HTTP(S).
//!
//! # Artifact Structure
//!
//! ```text
//! zstd( {"owner": ..., "homeDirectory": ..., "records": [...]} )
//! ```

use crate::models::ConfigDocument;
use crate::{Error, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default artifact file name, relative to the working directory.
pub const DEFAULT_EXPORT_PATH: &str = "confr.save";

/// zstd level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Largest artifact accepted from a remote source.
const MAX_REMOTE_BYTES: u64 = 64 * 1024 * 1024;

/// Largest document an artifact may decompress to.
const MAX_DOCUMENT_BYTES: u64 = 256 * 1024 * 1024;

/// User-Agent sent on remote imports.
const USER_AGENT: &str = concat!("confr/", env!("CARGO_PKG_VERSION"));

/// Serialize and compress a document.
pub fn pack(document: &ConfigDocument, level: i32) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(document)?;
    let compressed = zstd::encode_all(json.as_slice(), level)?;
    Ok(compressed)
}

/// Decompress and deserialize an artifact.
///
/// Anything that is not a zstd stream holding a document object with a
/// `records` list is rejected with [`Error::InvalidSaveFile`].
pub fn unpack(bytes: &[u8]) -> Result<ConfigDocument> {
    unpack_limited(bytes, MAX_DOCUMENT_BYTES)
}

fn unpack_limited(bytes: &[u8], limit: u64) -> Result<ConfigDocument> {
    let json = decompress(bytes, limit)
        .map_err(|e| Error::InvalidSaveFile(format!("could not decompress: {}", e)))?;
    if json.len() as u64 > limit {
        return Err(Error::InvalidSaveFile(format!(
            "document is larger than {} bytes",
            limit
        )));
    }

    let value: serde_json::Value = serde_json::from_slice(&json)
        .map_err(|e| Error::InvalidSaveFile(format!("could not parse: {}", e)))?;

    let has_records = value
        .get("records")
        .map(serde_json::Value::is_array)
        .unwrap_or(false);
    if !has_records {
        return Err(Error::InvalidSaveFile(
            "missing records list".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| Error::InvalidSaveFile(e.to_string()))
}

/// Decompress at most `limit + 1` bytes so oversized documents can be detected.
fn decompress(bytes: &[u8], limit: u64) -> std::io::Result<Vec<u8>> {
    let decoder = zstd::stream::read::Decoder::new(bytes)?;
    let mut json = Vec::new();
    decoder.take(limit + 1).read_to_end(&mut json)?;
    Ok(json)
}

/// Where an import reads its artifact from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    Local(PathBuf),
    Remote(String),
}

impl ImportSource {
    /// Interpret a command-line argument; `None` falls back to `default`.
    pub fn parse(arg: Option<&str>, default: &Path) -> Self {
        match arg {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Self::Remote(url.to_string())
            }
            Some(path) if !path.is_empty() => Self::Local(PathBuf::from(path)),
            _ => Self::Local(default.to_path_buf()),
        }
    }

    /// Fetch the raw artifact bytes.
    pub fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            Self::Local(path) => fs::read(path).map_err(|e| {
                Error::NotFound(format!("could not read {}: {}", path.display(), e))
            }),
            Self::Remote(url) => fetch_remote(url),
        }
    }
}

impl std::fmt::Display for ImportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{}", url),
        }
    }
}

fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    tracing::info!(url, "fetching remote artifact");

    let response = match ureq::get(url).set("User-Agent", USER_AGENT).call() {
        Ok(resp) => resp,
        Err(ureq::Error::Status(code, _)) => {
            return Err(Error::Http(format!("{} returned HTTP {}", url, code)));
        }
        Err(e) => return Err(Error::Http(e.to_string())),
    };

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_REMOTE_BYTES)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Write an artifact to `path`.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}
