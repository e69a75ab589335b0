//! Action Queue Module
//!
//! Single-consumer, many-producer executor for disk I/O.
//!
//! ## Responsibilities
//! - Run enqueued actions on one dedicated worker thread
//! - Preserve submission order across all producer threads
//! - Keep disk latency and disk failures off the caller's path
//! - Drain (best effort, bounded) on shutdown
//!
//! ## Flow
//! ```text
//!   producer A ──┐
//!   producer B ──┼──► unbounded channel ──► worker thread ──► filesystem
//!   producer C ──┘         (FIFO)          (one at a time)
//! ```
//!
//! A failing action is logged and skipped; it never stops the queue and is
//! never retried. Shutdown sends a poison pill behind the backlog and polls
//! for the worker to reach it.

mod action_queue;

pub use action_queue::ActionQueue;

/// Drain polls performed by a plain `stop()`
pub const DEFAULT_STOP_ATTEMPTS: u32 = 5;

/// Pause between drain polls for a plain `stop()` (milliseconds)
pub const DEFAULT_STOP_SLEEP_MS: u64 = 20;
