//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation
//!
//! # KDL Schema
//!
//! ```kdl
//! store-path "~/backups/conf.json"
//! export-path "~/backups/confr.save"
//! output-format "human"  // or "json"
//! compression-level 19
//! ```

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output, machine-readable
    Json,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Valid zstd levels for exports.
pub const COMPRESSION_LEVELS: std::ops::RangeInclusive<i32> = 1..=22;

/// User preferences stored in config.kdl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfrConfig {
    /// Location of the document
    pub store_path: Option<String>,

    /// Default artifact path for export/import
    pub export_path: Option<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// zstd level for exports
    pub compression_level: Option<i32>,
}

impl ConfrConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(level) = self.compression_level {
            if !COMPRESSION_LEVELS.contains(&level) {
                return Err(format!("compression-level must be 1-22, got {}", level));
            }
        }
        if matches!(self.store_path.as_deref(), Some("")) {
            return Err("store-path must not be empty".to_string());
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes are ignored; values of the wrong type are errors.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self, String> {
        let mut config = Self::new();

        config.store_path = string_value(doc, "store-path")?;
        config.export_path = string_value(doc, "export-path")?;

        if let Some(s) = string_value(doc, "output-format")? {
            config.output_format = Some(
                OutputFormat::parse(&s)
                    .ok_or_else(|| format!("output-format must be human or json, got {:?}", s))?,
            );
        }

        if let Some(node) = doc.get("compression-level") {
            let value = node
                .entries()
                .first()
                .and_then(|entry| entry.value().as_integer())
                .ok_or_else(|| "compression-level must be an integer".to_string())?;
            let level = i32::try_from(value)
                .map_err(|_| format!("compression-level out of range: {}", value))?;
            config.compression_level = Some(level);
        }

        config.validate()?;
        Ok(config)
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref path) = self.store_path {
            push_string(&mut doc, "store-path", path);
        }
        if let Some(ref path) = self.export_path {
            push_string(&mut doc, "export-path", path);
        }
        if let Some(format) = self.output_format {
            push_string(&mut doc, "output-format", format.as_str());
        }
        if let Some(level) = self.compression_level {
            let mut node = KdlNode::new("compression-level");
            node.push(KdlEntry::new(KdlValue::Integer(level as i128)));
            doc.nodes_mut().push(node);
        }

        doc
    }
}

fn string_value(doc: &KdlDocument, name: &str) -> Result<Option<String>, String> {
    let Some(node) = doc.get(name) else {
        return Ok(None);
    };
    node.entries()
        .first()
        .and_then(|entry| entry.value().as_string())
        .map(|s| Some(s.to_string()))
        .ok_or_else(|| format!("{} must be a string", name))
}

fn push_string(doc: &mut KdlDocument, name: &str, value: &str) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    doc.nodes_mut().push(node);
}
