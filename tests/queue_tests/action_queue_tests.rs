//! Tests for ActionQueue
//!
//! These tests verify:
//! - FIFO execution on a single worker
//! - Ordering across many producer threads
//! - Failing and panicking actions do not stop the queue
//! - Bounded shutdown (drained vs abandoned)
//! - Fence and lifecycle behavior

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use stashdb::queue::ActionQueue;
use stashdb::StoreError;

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_actions_run_in_enqueue_order() {
    let queue = ActionQueue::start("order").unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for i in 0..100 {
        let seen = Arc::clone(&seen);
        queue
            .enqueue(format!("push {}", i), move || {
                seen.lock().push(i);
                Ok(())
            })
            .unwrap();
    }

    assert!(queue.stop_with(200, 10));
    assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_actions_run_on_single_named_worker() {
    let queue = ActionQueue::start("DatabaseWriter test").unwrap();
    let names = Arc::new(Mutex::new(Vec::new()));

    for _ in 0..10 {
        let names = Arc::clone(&names);
        queue
            .enqueue("record thread", move || {
                names.lock().push(thread::current().name().map(str::to_string));
                Ok(())
            })
            .unwrap();
    }

    queue.fence().unwrap();
    let names = names.lock();
    assert_eq!(names.len(), 10);
    assert!(names
        .iter()
        .all(|n| n.as_deref() == Some("DatabaseWriter test")));
}

#[test]
fn test_per_producer_order_preserved_across_threads() {
    let queue = Arc::new(ActionQueue::start("producers").unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..4)
        .map(|producer| {
            let queue = Arc::clone(&queue);
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                for i in 0..50 {
                    let seen = Arc::clone(&seen);
                    queue
                        .enqueue("push", move || {
                            seen.lock().push((producer, i));
                            Ok(())
                        })
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    queue.fence().unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 200);
    for producer in 0..4 {
        let order: Vec<_> = seen
            .iter()
            .filter(|(p, _)| *p == producer)
            .map(|(_, i)| *i)
            .collect();
        assert_eq!(order, (0..50).collect::<Vec<_>>());
    }
}

// =============================================================================
// Failure Isolation Tests
// =============================================================================

#[test]
fn test_failing_action_does_not_stop_queue() {
    let queue = ActionQueue::start("failures").unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let before = Arc::clone(&counter);
    queue
        .enqueue("before", move || {
            before.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    queue
        .enqueue("fails", || Err(StoreError::NotFound(7)))
        .unwrap();
    let after = Arc::clone(&counter);
    queue
        .enqueue("after", move || {
            after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

    assert!(queue.stop_with(200, 10));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_panicking_action_does_not_kill_worker() {
    let queue = ActionQueue::start("panics").unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    queue
        .enqueue("panics", || panic!("boom"))
        .unwrap();
    let after = Arc::clone(&counter);
    queue
        .enqueue("after", move || {
            after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

    queue.fence().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(queue.pending(), 0);
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_stop_drains_backlog() {
    let queue = ActionQueue::start("drain").unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..20 {
        let counter = Arc::clone(&counter);
        queue
            .enqueue("slow", move || {
                thread::sleep(Duration::from_millis(1));
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
    }

    assert!(queue.stop_with(500, 10));
    assert_eq!(counter.load(Ordering::SeqCst), 20);
    assert_eq!(queue.pending(), 0);
}

#[test]
fn test_stop_gives_up_after_budget() {
    let queue = ActionQueue::start("slow").unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let counter = Arc::clone(&counter);
        queue
            .enqueue("very slow", move || {
                thread::sleep(Duration::from_millis(200));
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
    }

    // 2 polls x 5ms cannot cover 10 x 200ms of work
    assert!(!queue.stop_with(2, 5));
    assert!(!queue.is_running());

    // The action in flight finishes, the rest are abandoned
    thread::sleep(Duration::from_millis(600));
    assert!(counter.load(Ordering::SeqCst) < 10);
}

#[test]
fn test_stop_after_abandon_reports_undrained() {
    let queue = ActionQueue::start("abandoned").unwrap();
    for _ in 0..5 {
        queue
            .enqueue("slow", || {
                thread::sleep(Duration::from_millis(100));
                Ok(())
            })
            .unwrap();
    }

    assert!(!queue.stop_with(1, 1));
    // A second stop, even with a generous budget, keeps the first verdict
    assert!(!queue.stop_with(100, 10));
    assert!(!queue.stop());
}

#[test]
fn test_enqueue_after_stop_fails() {
    let queue = ActionQueue::start("stopped").unwrap();
    assert!(queue.is_running());
    assert!(queue.stop());
    assert!(!queue.is_running());

    let result = queue.enqueue("too late", || Ok(()));
    assert!(matches!(result, Err(StoreError::QueueClosed(_))));
    assert!(matches!(queue.fence(), Err(StoreError::QueueClosed(_))));
}

#[test]
fn test_stop_twice_is_harmless() {
    let queue = ActionQueue::start("twice").unwrap();
    assert!(queue.stop());
    assert!(queue.stop());
}

#[test]
fn test_drop_drains_queue() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let queue = ActionQueue::start("dropped").unwrap();
        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            queue
                .enqueue("count", move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }
    }
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn test_pending_counts_unfinished_actions() {
    let queue = ActionQueue::start("pending").unwrap();
    let (release_tx, release_rx) = crossbeam::channel::bounded::<()>(0);

    queue
        .enqueue("blocked", move || {
            let _ = release_rx.recv();
            Ok(())
        })
        .unwrap();
    queue.enqueue("queued", || Ok(())).unwrap();

    assert_eq!(queue.pending(), 2);
    release_tx.send(()).unwrap();
    queue.fence().unwrap();
    assert_eq!(queue.pending(), 0);
    assert_eq!(queue.name(), "pending");
}
