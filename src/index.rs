//! Facade bundling the interner, edge-type dictionary, topology, and
//! metrics behind a single owned type (C8), grounded on the teacher's
//! `GraphHandle` — the type every query and mutation entry point in the
//! teacher's graphstore is defined on.

use std::io::Read;
use std::path::Path;

use crate::error::GraphResult;
use crate::hydrate::{self, EdgeTypeDict, HydrationConfig};
use crate::interner::{Handle, Interner};
use crate::matcher::{self, Binding, Pattern};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::snapshot;
use crate::topology::{CompactionConfig, Direction, EType, Topology, VALID_FOREVER};
use crate::traversal::{self, TraversalBounds};

/// The embedded graph topology index. Owns everything needed to answer
/// queries; holds no handle to the upstream durable store.
#[derive(Debug, Default)]
pub struct GraphIndex {
    nodes: Interner,
    etypes: EdgeTypeDict,
    topology: Topology,
    metrics: Metrics,
    inserts_since_compaction: u64,
}

impl GraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s` as a node identity, returning its dense handle.
    pub fn intern_node(&mut self, s: &str) -> Handle {
        self.nodes.intern(s)
    }

    pub fn lookup_node(&self, s: &str) -> Option<Handle> {
        self.nodes.lookup(s)
    }

    pub fn resolve_node(&self, h: Handle) -> GraphResult<&str> {
        self.nodes.resolve(h)
    }

    pub fn intern_edge_type(&mut self, s: &str) -> EType {
        self.etypes.intern(s)
    }

    pub fn insert_edge(&mut self, src: Handle, dst: Handle, etype: EType, valid_from_us: i64, valid_to_us: i64) {
        self.topology.insert_edge(src, dst, etype, valid_from_us, valid_to_us);
        self.inserts_since_compaction += 1;
    }

    pub fn close_edge(&mut self, src: Handle, dst: Handle, etype: EType, at_us: i64) {
        self.topology.close_edge(src, dst, etype, at_us);
    }

    pub fn tombstone_node(&mut self, h: Handle) {
        self.topology.tombstone_node(h);
    }

    pub fn revive_node(&mut self, h: Handle) {
        self.topology.revive_node(h);
    }

    pub fn compact(&mut self) {
        self.topology.compact();
        self.inserts_since_compaction = 0;
        self.metrics.compactions.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }

    /// Compacts only once `config.trigger_after_inserts` edges have been
    /// inserted since the last compaction. Returns whether it ran.
    pub fn maybe_compact(&mut self, config: CompactionConfig) -> bool {
        if self.inserts_since_compaction >= config.trigger_after_inserts {
            self.compact();
            true
        } else {
            false
        }
    }

    /// Ingests an Arrow IPC edge stream, interning identities and edge
    /// types and inserting temporal edge records. See [`crate::hydrate`].
    pub fn hydrate<R: Read>(&mut self, reader: R, config: HydrationConfig) -> GraphResult<u64> {
        let n = hydrate::hydrate(reader, &mut self.nodes, &mut self.etypes, &mut self.topology, &self.metrics, config)?;
        Ok(n)
    }

    pub fn traverse(&self, seeds: &[Handle], etype: EType, direction: Direction, at_us: i64) -> Vec<Handle> {
        traversal::traverse(&self.topology, seeds, etype, direction, at_us)
    }

    pub fn traverse_bounded(&self, seeds: &[Handle], etype: EType, bounds: TraversalBounds) -> Vec<Handle> {
        traversal::traverse_bounded(&self.topology, seeds, etype, bounds, &self.metrics)
    }

    pub fn find_matches(&self, pattern: &Pattern, seeds: &[Handle], at_us: i64, max_results: Option<usize>) -> GraphResult<Vec<Binding>> {
        let result = matcher::find_matches(&self.topology, pattern, seeds, at_us, max_results)?;
        self.metrics.record_match();
        Ok(result)
    }

    pub fn save_snapshot(&self, path: &Path) -> GraphResult<()> {
        snapshot::save(path, &self.nodes, self.etypes.interner(), &self.topology, &self.metrics)?;
        Ok(())
    }

    pub fn load_snapshot(path: &Path) -> GraphResult<Self> {
        let metrics = Metrics::new();
        let (nodes, etype_interner, topology) = snapshot::load(path, &metrics)?;
        Ok(Self { nodes, etypes: EdgeTypeDict::from_interner(etype_interner), topology, metrics, inserts_since_compaction: 0 })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Convenience constant for "no close time yet" callers building edge
    /// records by hand instead of through `hydrate`.
    pub const VALID_FOREVER: i64 = VALID_FOREVER;
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod index_tests;
