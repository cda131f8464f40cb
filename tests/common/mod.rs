//! Common test utilities for confr integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `./conf.json` or `~/.config/confr/config.kdl`.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
pub use tempfile::TempDir;

/// A test environment with isolated storage.
///
/// Each `TestEnv` creates one temporary directory that is used as the working
/// directory, holds the store (via `CONFR_STORE`) and the config file (via
/// `CONFR_CONFIG`).
///
/// The `confr()` method sets both variables per-invocation, making tests
/// parallel-safe.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the confr binary with isolated storage.
    pub fn confr(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_confr"));
        cmd.current_dir(self.dir.path());
        cmd.env("CONFR_STORE", self.store_path());
        cmd.env("CONFR_CONFIG", self.config_path());
        cmd.env_remove("CONFR_LOG");
        cmd
    }

    /// Working directory of every invocation.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("conf.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.kdl")
    }

    /// Write a file under the test directory and return its absolute path.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Parse the store document.
    pub fn store(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.store_path()).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    /// Display names of the stored records, in order.
    pub fn record_names(&self) -> Vec<String> {
        self.store()["records"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["displayName"].as_str().unwrap().to_string())
            .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Move a file's modification time `secs` seconds away from now.
pub fn shift_mtime(path: &Path, secs: i64) {
    let now = SystemTime::now();
    let time = if secs >= 0 {
        now + Duration::from_secs(secs as u64)
    } else {
        now - Duration::from_secs(secs.unsigned_abs())
    };
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}
