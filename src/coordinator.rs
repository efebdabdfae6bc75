//! Write-coordination contract (C7).
//!
//! This crate does not own a write-ahead log or a commit protocol — that
//! lives in the durable columnar store this index is hydrated from. The
//! contract below is what a caller driving mutation through [`GraphIndex`]
//! must uphold; [`TopologyGuard`] is a reference implementation of that
//! contract for callers that just want a working lock, grounded on the
//! teacher's `storage/kv.rs`, which wraps its mutable state the same way
//! with a single `parking_lot::RwLock`.
//!
//! # Contract
//!
//! 1. Mutations (`insert_edge`, `tombstone_node`, `close_edge`, `hydrate`,
//!    `compact`) are never interleaved from two threads at once. A single
//!    writer at a time is assumed; this crate does not itself serialize
//!    writers.
//! 2. A mutation is durable in the upstream store *before* it is applied
//!    here — durable-first ordering. If the process crashes between the
//!    two, replaying the upstream log reconstructs an index identical to
//!    one that never crashed.
//! 3. Readers (`traverse`, `find_matches`, `active_out`/`active_in`) may run
//!    concurrently with each other, but never concurrently with a writer —
//!    this crate provides no MVCC; a reader observing a partially applied
//!    mutation is undefined behavior from its point of view, even though no
//!    memory unsafety results.

use parking_lot::RwLock;

use crate::index::GraphIndex;

/// A `parking_lot::RwLock`-backed wrapper enforcing the single-writer,
/// concurrent-readers discipline the contract above describes. Using this
/// is optional — any caller that already serializes its own writes (e.g.
/// a single-threaded event loop) can hold a bare `GraphIndex` instead.
#[derive(Debug, Default)]
pub struct TopologyGuard {
    inner: RwLock<GraphIndex>,
}

impl TopologyGuard {
    pub fn new(index: GraphIndex) -> Self {
        Self { inner: RwLock::new(index) }
    }

    /// Shared read access. Multiple readers may hold this concurrently.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, GraphIndex> {
        self.inner.read()
    }

    /// Exclusive write access. Blocks until any readers and the previous
    /// writer release their guards.
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, GraphIndex> {
        self.inner.write()
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod coordinator_tests;
