//! Configuration for StashDB
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::queue::{DEFAULT_STOP_ATTEMPTS, DEFAULT_STOP_SLEEP_MS};

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding this store's files. One directory per logical store.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── index.ddps       (next identity to allocate)
    ///     ├── 1.ddps           (record with identity 1)
    ///     └── 2.ddps           (record with identity 2)
    pub data_dir: PathBuf,

    /// Suffix applied to every record file and to the index file
    pub file_suffix: String,

    // -------------------------------------------------------------------------
    // Action Queue Configuration
    // -------------------------------------------------------------------------
    /// Name of the background writer thread. Derived from `data_dir` if unset.
    pub queue_name: Option<String>,

    /// How many times `stop()` polls for the queue to drain
    pub stop_attempts: u32,

    /// Pause between drain polls (milliseconds)
    pub stop_sleep_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./stashdb_data"),
            file_suffix: ".ddps".to_string(),
            queue_name: None,
            stop_attempts: DEFAULT_STOP_ATTEMPTS,
            stop_sleep_ms: DEFAULT_STOP_SLEEP_MS,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Name used for the action queue's worker thread
    pub fn queue_name(&self) -> String {
        self.queue_name
            .clone()
            .unwrap_or_else(|| format!("DatabaseWriter {}", self.data_dir.display()))
    }

    /// Reject settings the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.file_suffix.is_empty() {
            return Err(StoreError::Config("file suffix must not be empty".to_string()));
        }
        if !self.file_suffix.starts_with('.') {
            return Err(StoreError::Config(format!(
                "file suffix {:?} must start with '.'",
                self.file_suffix
            )));
        }
        if self.file_suffix.contains(['/', '\\']) {
            return Err(StoreError::Config(format!(
                "file suffix {:?} must not contain a path separator",
                self.file_suffix
            )));
        }
        if self.stop_attempts == 0 {
            return Err(StoreError::Config(
                "stop_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the record/index file suffix (e.g. ".ddps")
    pub fn file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.file_suffix = suffix.into();
        self
    }

    /// Set the worker thread name
    pub fn queue_name(mut self, name: impl Into<String>) -> Self {
        self.config.queue_name = Some(name.into());
        self
    }

    /// Set the default number of drain polls used by `stop()`
    pub fn stop_attempts(mut self, attempts: u32) -> Self {
        self.config.stop_attempts = attempts;
        self
    }

    /// Set the default pause between drain polls (in milliseconds)
    pub fn stop_sleep_ms(mut self, ms: u64) -> Self {
        self.config.stop_sleep_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
