//! Table Module
//!
//! In-memory map from identity to record. The authoritative read path.
//!
//! ## Responsibilities
//! - Fast point lookups and snapshots
//! - Many concurrent readers, one mutator at a time
//! - Report when a removal leaves the table empty (allocator reset)
//!
//! ## Data Structure Choice
//! HashMap wrapped in a parking_lot RwLock:
//! - Identity order is irrelevant to the store
//! - Snapshots clone out under a short read lock, never a live handle
//!
//! The store adds its own modification lock around every mutation; the
//! RwLock here only keeps readers consistent.

mod record_table;

pub use record_table::RecordTable;
