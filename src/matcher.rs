//! Backtracking subgraph pattern matcher (C5).
//!
//! The teacher has no pattern-matching code of its own; this is grounded on
//! the constraint-ordering and partial-assignment shape in
//! `other_examples/57657f6d_relateby-pattern-rs__crates-pattern-core-src-graph-graph_query.rs`,
//! adapted to the dense `Handle` adjacency this crate uses instead of that
//! crate's node-object graph.

use crate::error::PatternError;
use crate::interner::Handle;
use crate::topology::{EType, Topology};

/// One constraint in a pattern: an edge of type `etype` from `src_var` to
/// `dst_var`, where each var is an index into the pattern's variable list.
#[derive(Debug, Clone, Copy)]
pub struct PatternEdge {
    pub src_var: usize,
    pub dst_var: usize,
    pub etype: EType,
}

/// A subgraph pattern: some number of variables and the edges that must
/// hold between them. Variables not mentioned by any edge are rejected at
/// `Pattern::new` time — the spec has no use for them.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub num_vars: usize,
    pub edges: Vec<PatternEdge>,
}

impl Pattern {
    pub fn new(num_vars: usize, edges: Vec<PatternEdge>) -> Self {
        Self { num_vars, edges }
    }
}

/// A full variable-to-handle assignment satisfying every edge in the
/// pattern, injective (no two variables map to the same handle).
pub type Binding = Vec<Handle>;

/// Finds every injective binding of `pattern`'s variables to handles in
/// `topology` such that each pattern edge corresponds to an edge active at
/// `at_us`, expanding the search only from the supplied `seeds` (bound to
/// var 0, per spec.md §4.5's seed expansion rule). `max_results` bounds the
/// search for patterns with a combinatorial number of matches; `None` means
/// exhaustive.
pub fn find_matches(
    topology: &Topology,
    pattern: &Pattern,
    seeds: &[Handle],
    at_us: i64,
    max_results: Option<usize>,
) -> Result<Vec<Binding>, PatternError> {
    let order = order_edges(pattern)?;

    let mut results = Vec::new();
    for &seed in seeds {
        if let Some(limit) = max_results {
            if results.len() >= limit {
                break;
            }
        }
        let mut assignment: Vec<Option<Handle>> = vec![None; pattern.num_vars];
        if pattern.num_vars > 0 {
            assignment[0] = Some(seed);
        }
        backtrack(topology, pattern, &order, 0, &mut assignment, at_us, max_results, &mut results);
    }
    Ok(results)
}

/// Orders pattern edges so that, processed in order, each edge has at least
/// one endpoint var already bound by an earlier edge. Var 0 is always the
/// anchor — it is the one variable the caller's seed list binds before the
/// search starts — so the first edge picked is always one that mentions it.
fn order_edges(pattern: &Pattern) -> Result<Vec<PatternEdge>, PatternError> {
    if pattern.edges.is_empty() {
        return Ok(Vec::new());
    }
    let mut remaining: Vec<(usize, PatternEdge)> = pattern.edges.iter().copied().enumerate().collect();
    let mut bound_vars = std::collections::HashSet::new();
    let mut ordered = Vec::with_capacity(remaining.len());

    // Seed with var 0, the variable the caller's seed list binds.
    bound_vars.insert(0usize);

    while !remaining.is_empty() {
        let pick = remaining
            .iter()
            .position(|(_, e)| bound_vars.contains(&e.src_var) || bound_vars.contains(&e.dst_var));
        let Some(pos) = pick else {
            let (idx, _) = remaining[0];
            return Err(PatternError::Unbound { edge_index: idx });
        };
        let (_, edge) = remaining.remove(pos);
        bound_vars.insert(edge.src_var);
        bound_vars.insert(edge.dst_var);
        ordered.push(edge);
    }
    Ok(ordered)
}

fn backtrack(
    topology: &Topology,
    pattern: &Pattern,
    order: &[PatternEdge],
    step: usize,
    assignment: &mut Vec<Option<Handle>>,
    at_us: i64,
    max_results: Option<usize>,
    results: &mut Vec<Binding>,
) {
    if let Some(limit) = max_results {
        if results.len() >= limit {
            return;
        }
    }
    if step == order.len() {
        if assignment.iter().all(Option::is_some) {
            results.push(assignment.iter().map(|h| h.unwrap()).collect());
        }
        return;
    }

    let edge = order[step];
    let src_bound = assignment[edge.src_var];
    let dst_bound = assignment[edge.dst_var];

    match (src_bound, dst_bound) {
        (Some(s), Some(d)) => {
            if topology.active_out(s, edge.etype, at_us).contains(&d) {
                backtrack(topology, pattern, order, step + 1, assignment, at_us, max_results, results);
            }
        }
        (Some(s), None) => {
            for candidate in topology.active_out(s, edge.etype, at_us) {
                if assigned_elsewhere(assignment, edge.dst_var, candidate) {
                    continue;
                }
                assignment[edge.dst_var] = Some(candidate);
                backtrack(topology, pattern, order, step + 1, assignment, at_us, max_results, results);
                assignment[edge.dst_var] = None;
            }
        }
        (None, Some(d)) => {
            for candidate in topology.active_in(d, edge.etype, at_us) {
                if assigned_elsewhere(assignment, edge.src_var, candidate) {
                    continue;
                }
                assignment[edge.src_var] = Some(candidate);
                backtrack(topology, pattern, order, step + 1, assignment, at_us, max_results, results);
                assignment[edge.src_var] = None;
            }
        }
        (None, None) => {
            // Unreachable: var 0 is bound before the search starts and
            // `order_edges` only ever picks an edge that touches an
            // already-bound var, so the first picked edge always has one.
            debug_assert!(false, "order_edges produced an edge with both endpoints unbound");
        }
    }
}

fn assigned_elsewhere(assignment: &[Option<Handle>], var: usize, candidate: Handle) -> bool {
    assignment.iter().enumerate().any(|(v, h)| v != var && *h == Some(candidate))
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod matcher_tests;
