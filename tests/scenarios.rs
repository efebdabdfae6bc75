use qgraph_core::index::GraphIndex;
use qgraph_core::matcher::{Pattern, PatternEdge};
use qgraph_core::topology::{Direction, VALID_FOREVER};
use qgraph_core::traversal::TraversalBounds;

#[test]
fn s1_chain_traversal_depth_bounds() {
    let mut idx = GraphIndex::new();
    let a = idx.intern_node("A");
    let b = idx.intern_node("B");
    let c = idx.intern_node("C");
    let d = idx.intern_node("D");
    let e = idx.intern_node("E");
    let next = idx.intern_edge_type("NEXT");
    idx.insert_edge(a, b, next, 0, VALID_FOREVER);
    idx.insert_edge(b, c, next, 0, VALID_FOREVER);
    idx.insert_edge(c, d, next, 0, VALID_FOREVER);
    idx.insert_edge(d, e, next, 0, VALID_FOREVER);

    let shallow = idx.traverse_bounded(&[a], next, TraversalBounds { min_depth: 1, max_depth: 2, direction: Direction::Out, at_us: i64::MAX });
    let mut shallow = shallow;
    shallow.sort();
    assert_eq!(shallow, vec![b, c]);

    let mid = idx.traverse_bounded(&[a], next, TraversalBounds { min_depth: 2, max_depth: 4, direction: Direction::Out, at_us: i64::MAX });
    let mut mid = mid;
    mid.sort();
    assert_eq!(mid, vec![c, d, e]);

    let deep = idx.traverse_bounded(&[a], next, TraversalBounds { min_depth: 1, max_depth: 10, direction: Direction::Out, at_us: i64::MAX });
    let mut deep = deep;
    deep.sort();
    assert_eq!(deep, vec![b, c, d, e]);
}

#[test]
fn s2_cycle_does_not_loop_forever() {
    let mut idx = GraphIndex::new();
    let a = idx.intern_node("A");
    let b = idx.intern_node("B");
    let looped = idx.intern_edge_type("LOOP");
    idx.insert_edge(a, b, looped, 0, VALID_FOREVER);
    idx.insert_edge(b, a, looped, 0, VALID_FOREVER);

    let result = idx.traverse_bounded(&[a], looped, TraversalBounds { min_depth: 1, max_depth: 5, direction: Direction::Out, at_us: i64::MAX });
    assert_eq!(result, vec![b]);
}

#[test]
fn s3_temporal_filtering_across_close_and_reopen() {
    let mut idx = GraphIndex::new();
    let a = idx.intern_node("A");
    let b = idx.intern_node("B");
    let c = idx.intern_node("C");
    let link = idx.intern_edge_type("LINK");

    idx.insert_edge(a, b, link, 1000, VALID_FOREVER);
    idx.close_edge(a, b, link, 2000);
    idx.insert_edge(a, c, link, 3000, VALID_FOREVER);

    assert_eq!(idx.traverse(&[a], link, Direction::Out, 1500), vec![b]);
    assert!(idx.traverse(&[a], link, Direction::Out, 2500).is_empty());
    assert_eq!(idx.traverse(&[a], link, Direction::Out, 3500), vec![c]);
}

#[test]
fn s4_dedup_at_compaction() {
    let mut idx = GraphIndex::new();
    let a = idx.intern_node("A");
    let b = idx.intern_node("B");
    let k = idx.intern_edge_type("K");
    idx.insert_edge(a, b, k, 0, VALID_FOREVER);
    idx.insert_edge(a, b, k, 0, VALID_FOREVER);
    idx.insert_edge(a, b, k, 0, VALID_FOREVER);

    idx.compact();
    assert_eq!(idx.traverse(&[a], k, Direction::Out, i64::MAX), vec![b]);
}

#[test]
fn s5_triangle_pattern_match() {
    let mut idx = GraphIndex::new();
    let a = idx.intern_node("A");
    let b = idx.intern_node("B");
    let c = idx.intern_node("C");
    let next = idx.intern_edge_type("NEXT");
    idx.insert_edge(a, b, next, 0, VALID_FOREVER);
    idx.insert_edge(b, c, next, 0, VALID_FOREVER);
    idx.insert_edge(c, a, next, 0, VALID_FOREVER);

    let pattern = Pattern::new(
        3,
        vec![
            PatternEdge { src_var: 0, dst_var: 1, etype: next },
            PatternEdge { src_var: 1, dst_var: 2, etype: next },
            PatternEdge { src_var: 2, dst_var: 0, etype: next },
        ],
    );
    let matches = idx.find_matches(&pattern, &[a], i64::MAX, None).unwrap();
    assert_eq!(matches, vec![vec![a, b, c]], "seed [A] must anchor var 0 to A only");
}

#[test]
fn s6_snapshot_round_trip_and_corruption_detection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.bin");

    let mut idx = GraphIndex::new();
    let a = idx.intern_node("A");
    let b = idx.intern_node("B");
    let c = idx.intern_node("C");
    let d = idx.intern_node("D");
    let e = idx.intern_node("E");
    let next = idx.intern_edge_type("NEXT");
    idx.insert_edge(a, b, next, 0, VALID_FOREVER);
    idx.insert_edge(b, c, next, 0, VALID_FOREVER);
    idx.insert_edge(c, d, next, 0, VALID_FOREVER);
    idx.insert_edge(d, e, next, 0, VALID_FOREVER);
    idx.save_snapshot(&path).unwrap();

    let loaded = GraphIndex::load_snapshot(&path).unwrap();
    let la = loaded.lookup_node("A").unwrap();
    let lb = loaded.lookup_node("B").unwrap();
    let lnext = loaded.lookup_node("NEXT"); // sanity: node namespace not polluted by edge types
    assert!(lnext.is_none());
    assert_eq!(loaded.traverse(&[la], next, Direction::Out, i64::MAX), vec![lb]);

    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&path, bytes).unwrap();

    let err = GraphIndex::load_snapshot(&path).unwrap_err();
    assert!(matches!(err, qgraph_core::GraphError::Snapshot(qgraph_core::SnapshotError::Corrupt { .. })));
}
