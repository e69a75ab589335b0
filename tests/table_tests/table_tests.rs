//! RecordTable Tests
//!
//! Tests verify:
//! - Basic put/get/remove
//! - Empty detection on removal
//! - Snapshots are copies
//! - Concurrent readers alongside a writer

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;

use common::Flavor;
use stashdb::table::RecordTable;

fn flavor(identity: u64, color: &str, flavor: &str) -> Flavor {
    let mut f = Flavor::new(color, flavor);
    f.identity = identity;
    f
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_table_is_empty() {
    let table: RecordTable<Flavor> = RecordTable::new();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
    assert!(table.values().is_empty());
}

#[test]
fn test_put_and_get() {
    let table = RecordTable::new();
    table.put(flavor(1, "orange", "vanilla"));

    assert!(table.contains(1));
    assert_eq!(table.get(1), Some(flavor(1, "orange", "vanilla")));
    assert_eq!(table.get(2), None);
}

#[test]
fn test_put_replaces_same_identity() {
    let table = RecordTable::new();
    assert_eq!(table.put(flavor(1, "black", "taffy")), None);

    let old = table.put(flavor(1, "black", "lemon"));
    assert_eq!(old, Some(flavor(1, "black", "taffy")));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(1).unwrap().flavor, "lemon");
}

#[test]
fn test_remove_reports_emptiness() {
    let table = RecordTable::new();
    table.put(flavor(1, "orange", "vanilla"));
    table.put(flavor(2, "blue", "candy corn"));

    let (removed, now_empty) = table.remove(1);
    assert_eq!(removed.unwrap().identity, 1);
    assert!(!now_empty);

    let (removed, now_empty) = table.remove(2);
    assert!(removed.is_some());
    assert!(now_empty);

    let (removed, now_empty) = table.remove(2);
    assert!(removed.is_none());
    assert!(now_empty);
}

#[test]
fn test_extend_and_identities() {
    let table = RecordTable::new();
    table.extend(vec![
        flavor(3, "white", "chocolate"),
        flavor(1, "orange", "vanilla"),
        flavor(2, "blue", "candy corn"),
    ]);

    assert_eq!(table.identities(), vec![1, 2, 3]);
}

#[test]
fn test_values_is_a_snapshot() {
    let table = RecordTable::new();
    table.put(flavor(1, "orange", "vanilla"));

    let mut snapshot = table.values();
    snapshot[0].flavor = "changed".to_string();
    table.put(flavor(2, "blue", "candy corn"));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(table.get(1).unwrap().flavor, "vanilla");
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_readers_with_writer() {
    let table = Arc::new(RecordTable::new());

    let writer = {
        let table = Arc::clone(&table);
        thread::spawn(move || {
            for i in 1..=1000 {
                table.put(flavor(i, "orange", "vanilla"));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for _ in 0..100 {
                    let snapshot = table.values();
                    assert!(snapshot.len() <= 1000);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(table.len(), 1000);
}
