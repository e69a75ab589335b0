//! # StashDB
//!
//! A lightweight, in-memory-first, disk-persisted record store:
//! - Every live record held in memory for fast reads
//! - Monotonic numeric identities, recoverable after restart
//! - Write-behind persistence: one file per record, written off the caller's path
//! - Strict disk ordering through a single writer thread
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Callers (many threads)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ write / update / delete / values
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store<T>                              │
//! │        (load lock, per-kind locks, modification lock)        │
//! └───────┬─────────────────────┬─────────────────────┬─────────┘
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!  ┌─────────────┐      ┌──────────────┐      ┌──────────────┐
//!  │ RecordTable │      │IndexAllocator│      │ ActionQueue  │
//!  │  (RwLock)   │      │   (atomic)   │      │ (1 worker)   │
//!  └─────────────┘      └──────────────┘      └──────┬───────┘
//!         ▲                                          │ FIFO
//!         │ first access                             ▼
//!  ┌─────────────┐                           ┌──────────────┐
//!  │ DiskLoader  │◄──────────────────────────│  data_dir/   │
//!  └─────────────┘                           │ 1.ddps index │
//!                                            └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use stashdb::{Document, Store};
//!
//! let store: Store<Document> = Store::open_path("./flavors".as_ref()).unwrap();
//! let written = store.write(Document::new().with("flavor", "vanilla")).unwrap();
//! assert_eq!(written.identity, 1);
//! store.stop();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod queue;
pub mod allocator;
pub mod table;
pub mod storage;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use record::{Document, Record};
pub use store::{Store, StoreState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of StashDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
