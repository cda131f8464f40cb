//! Configuration for confr.
//!
//! ## config.kdl - User preferences
//!
//! Located at `$CONFR_CONFIG`, or `~/.config/confr/config.kdl` when unset.
//!
//! Contains:
//! - `store-path` - Location of the JSON document
//! - `export-path` - Default artifact for export/import
//! - `output-format` - "human" or "json"
//! - `compression-level` - zstd level for exports (1-22)
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.kdl > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFR_CONFIG_ENV, CONFR_STORE_ENV, ConfigOverrides, Resolved, Settings, ValueSource,
    config_file_path, load_config_file, resolve_settings, resolve_settings_with,
};
pub use schema::{COMPRESSION_LEVELS, ConfrConfig, OutputFormat};
