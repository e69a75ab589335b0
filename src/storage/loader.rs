//! Disk Loader
//!
//! One-time bulk read of every record file in a store directory.
//!
//! Only the exact `index<suffix>` file is treated as the index. Other files
//! whose names merely start with "index" fall under the usual suffix and
//! numeric-name rules.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::record::Record;

use super::files;

/// Reads all record files of a store directory
pub struct DiskLoader {
    /// Store directory
    dir: PathBuf,

    /// Record file suffix (".ddps")
    suffix: String,
}

/// Result of a load
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadResult {
    /// Records deserialized and returned
    pub records_loaded: u64,

    /// Record files that were empty or whitespace-only
    pub blank_skipped: u64,

    /// Files that are not record files (other suffixes, temp files)
    pub files_ignored: u64,

    /// Whether the directory existed at all
    pub directory_found: bool,
}

impl DiskLoader {
    pub fn new(dir: &Path, suffix: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            suffix: suffix.to_string(),
        }
    }

    /// Load every record in the directory
    ///
    /// A missing directory is an empty store. Blank files are skipped. Any
    /// file that fails to deserialize, or whose name does not match the
    /// identity inside it, aborts the whole load.
    pub fn load<T: Record>(&self) -> Result<(Vec<T>, LoadResult)> {
        let mut result = LoadResult::default();

        if !self.dir.exists() {
            tracing::debug!(
                "{} directory missing, adding nothing to the data list",
                self.dir.display()
            );
            return Ok((Vec::new(), result));
        }
        result.directory_found = true;

        let index_name = files::index_path(&self.dir, &self.suffix);
        let mut paths = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type()?.is_file() || path == index_name {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if files::is_temp_file(&file_name) || !file_name.ends_with(&self.suffix) {
                tracing::debug!("{} is not a record file, ignoring", file_name);
                result.files_ignored += 1;
                continue;
            }

            paths.push(path);
        }

        // Deterministic order, so the same corruption is always reported first
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in &paths {
            match self.read_and_deserialize::<T>(path)? {
                Some(record) => {
                    records.push(record);
                    result.records_loaded += 1;
                }
                None => result.blank_skipped += 1,
            }
        }

        tracing::debug!(
            dir = %self.dir.display(),
            loaded = result.records_loaded,
            blank = result.blank_skipped,
            ignored = result.files_ignored,
            "Loaded records from disk"
        );

        Ok((records, result))
    }

    /// Read one record file. `Ok(None)` means the file was blank.
    fn read_and_deserialize<T: Record>(&self, path: &Path) -> Result<Option<T>> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => StoreError::CorruptRecord {
                path: path.to_path_buf(),
                reason: "file is not valid UTF-8".to_string(),
            },
            _ => StoreError::Io(e),
        })?;

        if contents.trim().is_empty() {
            tracing::debug!("{} file exists but empty, skipping", path.display());
            return Ok(None);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_identity =
            files::identity_from_file_name(&file_name).ok_or_else(|| StoreError::CorruptRecord {
                path: path.to_path_buf(),
                reason: format!("file name must look like 1{}", self.suffix),
            })?;

        let record = T::from_text(&contents).map_err(|e| StoreError::CorruptRecord {
            path: path.to_path_buf(),
            reason: format!("failed to deserialize (\"{}\"): {}", contents.trim(), e),
        })?;

        if record.identity() != file_identity {
            return Err(StoreError::IdentityMismatch {
                path: path.to_path_buf(),
                file_identity,
                record_identity: record.identity(),
            });
        }

        Ok(Some(record))
    }
}
