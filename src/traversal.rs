//! Breadth-first traversal (C4), grounded on the teacher's
//! `BasicRuntime::neighbors_bfs` — a frontier-by-frontier BFS over the
//! adjacency segments with a visited set to avoid revisiting nodes,
//! generalized here with a `[min_depth, max_depth]` bound and a per-hop
//! temporal filter instead of the teacher's single "now" snapshot.

use std::collections::HashSet;

use crate::interner::Handle;
use crate::metrics::Metrics;
use crate::topology::{Direction, EType, Topology};

/// Bounds and parameters for a bounded BFS traversal.
#[derive(Debug, Clone, Copy)]
pub struct TraversalBounds {
    pub min_depth: u32,
    pub max_depth: u32,
    pub direction: Direction,
    pub at_us: i64,
}

impl Default for TraversalBounds {
    fn default() -> Self {
        Self { min_depth: 0, max_depth: 1, direction: Direction::Out, at_us: i64::MAX }
    }
}

/// Single-hop neighbor set across every seed, deduplicated (set semantics
/// at the hop boundary), filtered to edges of `etype` active at `at_us`.
pub fn traverse(topology: &Topology, seeds: &[Handle], etype: EType, direction: Direction, at_us: i64) -> Vec<Handle> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &seed in seeds {
        let hop = match direction {
            Direction::Out => topology.active_out(seed, etype, at_us),
            Direction::In => topology.active_in(seed, etype, at_us),
        };
        for h in hop {
            if seen.insert(h) {
                out.push(h);
            }
        }
    }
    out
}

/// Multi-hop BFS from a set of start nodes. Nodes at depth `d` are included
/// in the result only if `min_depth <= d <= max_depth`; the visited set is
/// seeded with the entire start frontier so cycles never revisit an
/// already-expanded node — including a cycle back to any other seed — and
/// each reachable node appears at most once, at its shortest depth from any
/// seed, matching the teacher's cycle guard generalized to a forest with
/// multiple roots.
pub fn traverse_bounded(
    topology: &Topology,
    seeds: &[Handle],
    etype: EType,
    bounds: TraversalBounds,
    metrics: &Metrics,
) -> Vec<Handle> {
    metrics.record_traversal();
    let mut visited: HashSet<Handle> = seeds.iter().copied().collect();
    let mut frontier: Vec<Handle> = seeds.to_vec();
    let mut result = Vec::new();
    let mut depth = 0u32;

    while depth < bounds.max_depth && !frontier.is_empty() {
        depth += 1;
        let mut next = Vec::new();
        for &node in &frontier {
            for neighbor in traverse(topology, &[node], etype, bounds.direction, bounds.at_us) {
                if visited.insert(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        if depth >= bounds.min_depth {
            result.extend(next.iter().copied());
        }
        frontier = next;
    }
    result
}

#[cfg(test)]
#[path = "traversal_tests.rs"]
mod traversal_tests;
