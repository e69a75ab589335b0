//! File utilities
//!
//! Path naming for record and index files, directory creation, and
//! replace-by-rename text writes.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Stem of the index file ("index" + suffix)
pub const INDEX_FILE_STEM: &str = "index";

/// Suffix of in-flight temporary files
const TEMP_SUFFIX: &str = ".tmp";

/// Create a directory and any missing parents
pub fn make_directory(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Write text to `path`, replacing any previous content
///
/// Writes a hidden temp sibling, fsyncs it, then renames it over the target,
/// so a reader sees either the old content or the new content.
pub fn write_string(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = temp_path_for(path)?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    // Make the rename itself durable
    if let Some(parent) = path.parent() {
        if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
            tracing::warn!(
                dir = %parent.display(),
                error = %e,
                "Failed to sync directory after rename"
            );
        }
    }

    Ok(())
}

/// Path of the record file for an identity
/// (dir, 42, ".ddps") → "dir/42.ddps"
pub fn record_path(dir: &Path, identity: u64, suffix: &str) -> PathBuf {
    dir.join(format!("{}{}", identity, suffix))
}

/// Path of the index file
/// (dir, ".ddps") → "dir/index.ddps"
pub fn index_path(dir: &Path, suffix: &str) -> PathBuf {
    dir.join(format!("{}{}", INDEX_FILE_STEM, suffix))
}

/// Identity encoded in a record file name: the integer before the first '.'
/// "42.ddps" → Some(42), "abc.ddps" → None, ".ddps" → None
pub fn identity_from_file_name(file_name: &str) -> Option<u64> {
    let (stem, _) = file_name.split_once('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Whether a file name belongs to an in-flight `write_string`
pub fn is_temp_file(file_name: &str) -> bool {
    file_name.starts_with('.') && file_name.ends_with(TEMP_SUFFIX)
}

/// "dir/42.ddps" → "dir/.42.ddps.tmp"
fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let temp_name = format!(".{}{}", file_name.to_string_lossy(), TEMP_SUFFIX);
    Ok(path.with_file_name(temp_name))
}
