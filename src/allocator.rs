//! Index Allocator
//!
//! Hands out record identities and knows where the counter is persisted.
//!
//! The in-memory counter advances on every `next()`. The index file is only
//! rewritten by the store's queued actions (after a record file is written,
//! or reset to 1 when the table empties), so on disk it can trail memory
//! until the action queue drains.
//!
//! Crash window: an identity handed to a caller whose queued write never ran
//! is lost. After restart the counter resumes from the last flushed value,
//! which is one past the highest identity that made it to disk, so that
//! identity may be issued again to a different record.
//!
//! The opposite case (a record file written, the index update lost) is
//! repaired on load: the store raises the counter past every loaded identity.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, StoreError};
use crate::storage::files;

/// First identity of an empty store
pub const FIRST_IDENTITY: u64 = 1;

/// Monotonic identity counter backed by an index file
#[derive(Debug)]
pub struct IndexAllocator {
    /// Path of the index file
    path: PathBuf,

    /// Next identity to hand out (atomic, lock-free)
    next: AtomicU64,
}

impl IndexAllocator {
    /// Open the allocator for an index file
    ///
    /// A missing file starts the counter at 1. A present file must hold an
    /// integer on its first line; anything else is a corrupt store.
    pub fn open(path: &Path) -> Result<Self> {
        let start = if path.exists() {
            Self::read_index_file(path)?
        } else {
            FIRST_IDENTITY
        };

        tracing::debug!(index_file = %path.display(), next = start, "Index allocator opened");

        Ok(Self {
            path: path.to_path_buf(),
            next: AtomicU64::new(start),
        })
    }

    /// Allocate an identity (fetch-and-add)
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// The identity the next `next()` call will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }

    /// Advance the counter to at least `floor`
    ///
    /// Returns whether the counter moved.
    pub fn raise_to(&self, floor: u64) -> bool {
        self.next.fetch_max(floor, Ordering::SeqCst) < floor
    }

    /// Start counting from 1 again (the table just became empty)
    pub fn reset(&self) {
        self.next.store(FIRST_IDENTITY, Ordering::SeqCst);
    }

    /// Write a "next identity" value to the index file
    ///
    /// Called from queued actions only.
    pub fn persist(&self, next_identity: u64) -> Result<()> {
        files::write_string(&self.path, &next_identity.to_string())?;
        Ok(())
    }

    /// Path of the index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the first line of an index file
    /// "4\n" → 4, "  12 " → 12, "" → error, "four" → error
    pub fn read_index_file(path: &Path) -> Result<u64> {
        let corrupt = |reason: String| StoreError::CorruptIndex {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read_to_string(path)
            .map_err(|e| corrupt(format!("failed to read: {}", e)))?;
        let first_line = contents.lines().next().unwrap_or("").trim();

        if first_line.is_empty() {
            return Err(corrupt("expected a numeric value, found a blank line".to_string()));
        }

        let value: u64 = first_line
            .parse()
            .map_err(|e| corrupt(format!("{:?} is not a valid identity: {}", first_line, e)))?;

        if value == 0 {
            return Err(corrupt("identities start at 1, found 0".to_string()));
        }
        Ok(value)
    }
}
