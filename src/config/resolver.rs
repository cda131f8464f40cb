//! Precedence resolution for runtime settings.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. `CONFR_STORE` environment variable (store path only)
//! 3. config.kdl (`$CONFR_CONFIG` or `~/.config/confr/config.kdl`)
//! 4. Built-in defaults

use crate::archive::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_EXPORT_PATH};
use crate::config::{ConfrConfig, OutputFormat};
use crate::storage::DEFAULT_STORE_PATH;
use crate::{Error, Result};
use kdl::KdlDocument;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding the store path.
pub const CONFR_STORE_ENV: &str = "CONFR_STORE";

/// Environment variable overriding the config file location.
pub const CONFR_CONFIG_ENV: &str = "CONFR_CONFIG";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from the config file at the given path
    ConfigFile(String),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile(path) => write!(f, "config:{}", path),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Settings every command handler receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_path: Resolved<PathBuf>,
    pub export_path: Resolved<PathBuf>,
    pub output_format: Resolved<OutputFormat>,
    pub compression_level: Resolved<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: Resolved::new(PathBuf::from(DEFAULT_STORE_PATH), ValueSource::Default),
            export_path: Resolved::new(PathBuf::from(DEFAULT_EXPORT_PATH), ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Human, ValueSource::Default),
            compression_level: Resolved::new(DEFAULT_COMPRESSION_LEVEL, ValueSource::Default),
        }
    }
}

impl Settings {
    pub fn store_path(&self) -> &Path {
        &self.store_path.value
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path.value
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn compression_level(&self) -> i32 {
        self.compression_level.value
    }

    /// True when command output should be rendered for a person.
    pub fn human(&self) -> bool {
        self.output_format.value == OutputFormat::Human
    }
}

/// CLI flag overrides for settings resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--store` flag
    pub store_path: Option<PathBuf>,
    /// `--json` flag
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set store path override.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Set output format override.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Location of config.kdl.
///
/// `$CONFR_CONFIG` wins; otherwise the platform config directory is used.
/// Returns `None` when no config directory can be determined.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFR_CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("confr").join("config.kdl"))
}

/// Load config.kdl from `path`.
///
/// A missing file is an empty config; a file that cannot be read or parsed is
/// a [`Error::Config`].
pub fn load_config_file(path: &Path) -> Result<ConfrConfig> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfrConfig::default()),
        Err(e) => {
            return Err(Error::Config(format!(
                "could not read {}: {}",
                path.display(),
                e
            )));
        }
    };

    let doc: KdlDocument = text
        .parse()
        .map_err(|e| Error::Config(format!("invalid KDL in {}: {}", path.display(), e)))?;

    ConfrConfig::from_kdl(&doc).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Resolve settings from CLI overrides, the environment and config.kdl.
pub fn resolve_settings(overrides: &ConfigOverrides) -> Result<Settings> {
    let (config, origin) = match config_file_path() {
        Some(path) => {
            let config = load_config_file(&path)?;
            tracing::debug!(path = %path.display(), "loaded config file");
            (config, path.display().to_string())
        }
        None => (ConfrConfig::default(), String::new()),
    };

    Ok(resolve_settings_with(overrides, &config, &origin, |name| {
        std::env::var(name).ok()
    }))
}

/// Resolution core with explicit inputs.
///
/// `origin` names the config file for source tracking; `env` looks up an
/// environment variable.
pub fn resolve_settings_with<F>(
    overrides: &ConfigOverrides,
    config: &ConfrConfig,
    origin: &str,
    env: F,
) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let from_file = || ValueSource::ConfigFile(origin.to_string());
    let mut settings = Settings::default();

    // Store path: CLI > env > config > default
    if let Some(ref path) = overrides.store_path {
        settings.store_path = Resolved::new(path.clone(), ValueSource::CliFlag);
    } else if let Some(path) = env(CONFR_STORE_ENV).filter(|p| !p.is_empty()) {
        settings.store_path = Resolved::new(
            PathBuf::from(path),
            ValueSource::EnvVar(CONFR_STORE_ENV.to_string()),
        );
    } else if let Some(ref path) = config.store_path {
        settings.store_path = Resolved::new(expand_home(path), from_file());
    }

    if let Some(ref path) = config.export_path {
        settings.export_path = Resolved::new(expand_home(path), from_file());
    }

    if let Some(format) = overrides.output_format {
        settings.output_format = Resolved::new(format, ValueSource::CliFlag);
    } else if let Some(format) = config.output_format {
        settings.output_format = Resolved::new(format, from_file());
    }

    if let Some(level) = config.compression_level {
        settings.compression_level = Resolved::new(level, from_file());
    }

    settings
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
