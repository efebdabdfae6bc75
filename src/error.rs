//! Crate-wide error types.
//!
//! Every fallible operation returns one of these enums rather than panicking
//! on caller-supplied bad input. Panics are reserved for invariants the type
//! system already guarantees (e.g. a lock that is never held across a panic
//! path) and for tests.

use thiserror::Error;

/// Top-level error type returned by [`crate::index::GraphIndex`] operations.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("handle {handle} out of range (interner holds {len} handles)")]
    UnknownHandle { handle: u32, len: u32 },

    #[error(transparent)]
    Hydration(#[from] HydrationError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("allocation failed growing to capacity {requested}")]
    Alloc { requested: usize },
}

/// Errors surfaced while ingesting an Arrow IPC edge stream.
#[derive(Debug, Error)]
pub enum HydrationError {
    #[error("schema error: {reason}")]
    Schema { reason: String },

    #[error("decode error: {reason}")]
    Decode { reason: String },

    #[error("I/O error reading Arrow stream")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced while saving or loading a binary snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("snapshot corrupt: {reason}")]
    Corrupt { reason: String },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u16, expected: u16 },
}

/// Errors surfaced while evaluating a subgraph pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern edge {edge_index} has both endpoints unbound")]
    Unbound { edge_index: usize },
}

pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
