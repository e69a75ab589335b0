//! Store Module
//!
//! The public facade that coordinates the table, allocator, loader and
//! action queue.
//!
//! ## Responsibilities
//! - Lazily load the directory on first access (exactly once)
//! - Assign identities on write
//! - Mutate memory synchronously, persist to disk write-behind
//! - Shut down with a bounded drain

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use parking_lot::{Mutex, RwLock};

use crate::allocator::{IndexAllocator, FIRST_IDENTITY};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::queue::ActionQueue;
use crate::record::Record;
use crate::storage::{files, DiskLoader};
use crate::table::RecordTable;

/// Lifecycle of a store instance
///
/// `Uninitialized → Loaded → Stopped`, one way only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Constructed, nothing read from disk yet
    Uninitialized,

    /// Directory loaded into memory, serving operations
    Loaded,

    /// Stopped; every operation is rejected
    Stopped,
}

/// An in-memory, disk-persisted record store
///
/// ## Locking (narrowest scope last)
///
/// - **state** (load lock): RwLock around the lifecycle. Readers pass
///   through once loaded; the first caller takes it exclusively to load.
/// - **write / update / delete locks**: one per operation kind, so two
///   operations of the same kind never interleave their mutate+enqueue
///   sequence. Different kinds may overlap up to the modification lock.
/// - **modification lock**: held around the table mutation, the identity
///   bookkeeping and the (non-blocking) enqueue of the disk action, so the
///   queue sees changes in the same order as the table. Never held during
///   I/O.
///
/// Disk work happens on the action queue's worker, in enqueue order. A
/// returned `write()` is therefore not yet durable; use `flush()` or `stop()`
/// as a barrier.
pub struct Store<T: Record> {
    /// Store configuration
    config: Config,

    /// Lifecycle state, doubling as the load lock
    state: RwLock<StoreState>,

    /// Live records
    table: RecordTable<T>,

    /// Identity counter (shared with queued actions)
    allocator: Arc<IndexAllocator>,

    /// Single writer for every file in `data_dir`
    queue: ActionQueue,

    /// Serializes write operations
    write_lock: Mutex<()>,

    /// Serializes update operations
    update_lock: Mutex<()>,

    /// Serializes delete operations
    delete_lock: Mutex<()>,

    /// Serializes every table mutation
    modification_lock: Mutex<()>,
}

impl<T: Record> Store<T> {
    /// Open a store over a directory
    ///
    /// Reads the index file (a corrupt one fails here), starts the action
    /// queue and queues creation of the directory. Records are not read
    /// until the first operation.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let index_path = files::index_path(&config.data_dir, &config.file_suffix);
        let allocator = IndexAllocator::open(&index_path)?;

        let queue = ActionQueue::start(config.queue_name())?;

        let dir = config.data_dir.clone();
        queue.enqueue(format!("create directory {}", dir.display()), move || {
            files::make_directory(&dir)?;
            Ok(())
        })?;

        Ok(Self {
            config,
            state: RwLock::new(StoreState::Uninitialized),
            table: RecordTable::new(),
            allocator: Arc::new(allocator),
            queue,
            write_lock: Mutex::new(()),
            update_lock: Mutex::new(()),
            delete_lock: Mutex::new(()),
            modification_lock: Mutex::new(()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Write a new record
    ///
    /// Assigns the next identity, stores the record in memory and queues the
    /// file write. The returned record carries its identity; this is the only
    /// way a caller learns it.
    pub fn write(&self, mut record: T) -> Result<T> {
        let _write_guard = self.write_lock.lock();
        self.ensure_loaded()?;

        // Mutate memory and enqueue under one lock, so queue order matches
        // the order of table changes across operation kinds
        let _modification = self.modification_lock.lock();

        // Step 1: In-memory portion
        let identity = self.allocator.next();
        record.set_identity(identity);
        tracing::trace!(
            thread = ?thread::current().name(),
            identity,
            "Writing data"
        );
        self.table.put(record.clone());

        // Step 2: Disk portion
        let path = self.record_path(identity);
        let allocator = Arc::clone(&self.allocator);
        let to_persist = record.clone();
        self.queue.enqueue("persist data to disk", move || {
            tracing::trace!("Writing new data to {}", path.display());
            if path.exists() {
                return Err(StoreError::AlreadyExists(path));
            }
            let text = serialize_non_blank(&to_persist)?;
            files::write_string(&path, &text)?;
            allocator.persist(identity + 1)
        })?;

        Ok(record)
    }

    /// Replace a live record, keeping its identity
    pub fn update(&self, record: T) -> Result<()> {
        let _update_guard = self.update_lock.lock();
        self.ensure_loaded()?;

        let identity = record.identity();

        let _modification = self.modification_lock.lock();

        // Step 1: In-memory portion
        if !self.table.contains(identity) {
            return Err(StoreError::NotFound(identity));
        }
        tracing::trace!(
            thread = ?thread::current().name(),
            identity,
            "Updating data"
        );
        self.table.put(record.clone());

        // Step 2: Disk portion
        let path = self.record_path(identity);
        self.queue.enqueue("update data on disk", move || {
            tracing::trace!("Updating data at {}", path.display());
            if !path.exists() {
                return Err(StoreError::MissingFile(path));
            }
            let text = serialize_non_blank(&record)?;
            files::write_string(&path, &text)?;
            Ok(())
        })
    }

    /// Remove a live record
    ///
    /// If this empties the table the allocator restarts at 1, and the index
    /// file is rewritten to 1 once the file delete has run.
    pub fn delete(&self, record: &T) -> Result<()> {
        let _delete_guard = self.delete_lock.lock();
        self.ensure_loaded()?;

        let identity = record.identity();

        // A write racing with a delete-to-empty must queue behind the delete
        let _modification = self.modification_lock.lock();

        // Step 1: In-memory portion
        if !self.table.contains(identity) {
            return Err(StoreError::NotFound(identity));
        }
        tracing::trace!(
            thread = ?thread::current().name(),
            identity,
            "Deleting data"
        );
        let (_, has_reset_index) = self.table.remove(identity);
        if has_reset_index {
            self.allocator.reset();
        }

        // Step 2: Disk portion
        let path = self.record_path(identity);
        let allocator = Arc::clone(&self.allocator);
        self.queue.enqueue("delete data from disk", move || {
            tracing::trace!("Deleting data at {}", path.display());
            if !path.exists() {
                return Err(StoreError::MissingFile(path));
            }
            fs::remove_file(&path)?;
            if has_reset_index {
                allocator.persist(FIRST_IDENTITY)?;
            }
            Ok(())
        })
    }

    /// Snapshot of every live record, in no particular order
    pub fn values(&self) -> Result<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.table.values())
    }

    /// Look up a record by identity
    pub fn get(&self, identity: u64) -> Result<Option<T>> {
        self.ensure_loaded()?;
        Ok(self.table.get(identity))
    }

    /// Number of live records
    pub fn len(&self) -> Result<usize> {
        self.ensure_loaded()?;
        Ok(self.table.len())
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> Result<bool> {
        self.ensure_loaded()?;
        Ok(self.table.is_empty())
    }

    /// Wait until every disk action queued so far has run
    pub fn flush(&self) -> Result<()> {
        self.ensure_loaded()?;
        self.queue.fence()
    }

    /// Stop the store using the configured drain budget
    ///
    /// See [`Store::stop_with`].
    pub fn stop(&self) -> bool {
        self.stop_with(self.config.stop_attempts, self.config.stop_sleep_ms)
    }

    /// Stop the store, waiting at most `attempts × sleep_ms` for queued disk
    /// actions to finish
    ///
    /// Returns whether the backlog drained. Further operations fail with
    /// `StoreError::Stopped`.
    pub fn stop_with(&self, attempts: u32, sleep_ms: u64) -> bool {
        {
            // No operation can sit between its state check and its enqueue
            let _write_guard = self.write_lock.lock();
            let _update_guard = self.update_lock.lock();
            let _delete_guard = self.delete_lock.lock();
            *self.state.write() = StoreState::Stopped;
        }

        let drained = self.queue.stop_with(attempts, sleep_ms);
        tracing::debug!(
            dir = %self.config.data_dir.display(),
            drained,
            "Store stopped"
        );
        drained
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the store directory
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the index file path
    pub fn index_path(&self) -> &Path {
        self.allocator.path()
    }

    /// Identity the next `write()` would receive
    pub fn next_identity(&self) -> u64 {
        self.allocator.peek()
    }

    /// Disk actions queued but not yet run
    pub fn pending_actions(&self) -> usize {
        self.queue.pending()
    }

    /// Current lifecycle state
    pub fn state(&self) -> StoreState {
        *self.state.read()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Load from disk on first use; later callers pass straight through
    fn ensure_loaded(&self) -> Result<()> {
        match *self.state.read() {
            StoreState::Loaded => return Ok(()),
            StoreState::Stopped => return Err(StoreError::Stopped),
            StoreState::Uninitialized => {}
        }

        // Concurrent first callers block here until the winner has loaded
        let mut state = self.state.write();
        match *state {
            StoreState::Loaded => Ok(()),
            StoreState::Stopped => Err(StoreError::Stopped),
            StoreState::Uninitialized => {
                let loader = DiskLoader::new(&self.config.data_dir, &self.config.file_suffix);
                let (records, _) = loader.load::<T>()?;
                let highest = records.iter().map(T::identity).max();
                self.table.extend(records);

                // The index can trail the record files if a persist action
                // was cut short; never hand out a loaded identity again
                if let Some(highest) = highest {
                    if self.allocator.raise_to(highest + 1) {
                        tracing::warn!(
                            index_file = %self.allocator.path().display(),
                            next = highest + 1,
                            "Index file behind record files, advancing allocator"
                        );
                    }
                }
                *state = StoreState::Loaded;
                Ok(())
            }
        }
    }

    fn record_path(&self, identity: u64) -> PathBuf {
        files::record_path(&self.config.data_dir, identity, &self.config.file_suffix)
    }
}

impl<T: Record> Drop for Store<T> {
    fn drop(&mut self) {
        if self.state() != StoreState::Stopped {
            self.stop();
        }
    }
}

/// Serialize a record, refusing blank output
fn serialize_non_blank<T: Record>(record: &T) -> Result<String> {
    let text = record.to_text()?;
    if text.trim().is_empty() {
        return Err(StoreError::BlankRecord(record.identity()));
    }
    Ok(text)
}
