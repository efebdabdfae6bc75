//! Bidirectional string interner (C1).
//!
//! Mirrors the forward/reverse pairing in the teacher's `NodeDict`
//! (`graphstore/segments.rs`): a `HashMap` for forward lookup and a `Vec`
//! indexed by handle for reverse resolution. Handles are dense, append-only,
//! and never reassigned or reused — tombstoning a node lives one level up,
//! in the topology, not here.

use std::collections::HashMap;

use crate::error::{GraphError, GraphResult};

/// Dense handle into an [`Interner`]. Stable for the life of the index.
pub type Handle = u32;

/// Append-only bijection between strings and dense `u32` handles.
#[derive(Debug, Default)]
pub struct Interner {
    forward: HashMap<Box<str>, Handle>,
    reverse: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self { forward: HashMap::new(), reverse: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { forward: HashMap::with_capacity(cap), reverse: Vec::with_capacity(cap) }
    }

    /// Returns the existing handle for `s`, interning it if new. O(1) average.
    pub fn intern(&mut self, s: &str) -> Handle {
        if let Some(&h) = self.forward.get(s) {
            return h;
        }
        let h = self.reverse.len() as Handle;
        let boxed: Box<str> = s.into();
        self.reverse.push(boxed.clone());
        self.forward.insert(boxed, h);
        h
    }

    /// Forward lookup only; no side effect on the interner.
    pub fn lookup(&self, s: &str) -> Option<Handle> {
        self.forward.get(s).copied()
    }

    /// Resolves a handle back to its string. Errs on out-of-range handles
    /// rather than panicking, since callers may pass handles obtained
    /// elsewhere (e.g. deserialized from a snapshot or pattern match result).
    pub fn resolve(&self, h: Handle) -> GraphResult<&str> {
        self.reverse
            .get(h as usize)
            .map(|s| s.as_ref())
            .ok_or(GraphError::UnknownHandle { handle: h, len: self.reverse.len() as u32 })
    }

    /// Current handle count.
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Iterates all interned strings in handle order, for snapshot encoding.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.reverse.iter().map(|s| s.as_ref())
    }

    /// Rebuilds an interner from an ordered list of strings (snapshot decode).
    /// The caller guarantees the order matches original handle assignment.
    pub fn from_ordered(strings: Vec<Box<str>>) -> Self {
        let mut forward = HashMap::with_capacity(strings.len());
        for (i, s) in strings.iter().enumerate() {
            forward.insert(s.clone(), i as Handle);
        }
        Self { forward, reverse: strings }
    }
}

#[cfg(test)]
#[path = "interner_tests.rs"]
mod interner_tests;
