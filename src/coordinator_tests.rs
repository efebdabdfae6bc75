use super::*;
use crate::topology::Direction;

#[test]
fn write_guard_mutation_is_visible_to_subsequent_read_guard() {
    let guard = TopologyGuard::new(GraphIndex::new());
    let (a, b, knows) = {
        let mut w = guard.write();
        let a = w.intern_node("a");
        let b = w.intern_node("b");
        let knows = w.intern_edge_type("knows");
        w.insert_edge(a, b, knows, 0, GraphIndex::VALID_FOREVER);
        (a, b, knows)
    };

    let r = guard.read();
    assert_eq!(r.traverse(&[a], knows, Direction::Out, i64::MAX), vec![b]);
}

#[test]
fn concurrent_readers_can_hold_the_lock_at_once() {
    let guard = TopologyGuard::new(GraphIndex::new());
    let r1 = guard.read();
    let r2 = guard.read();
    assert_eq!(r1.node_count(), r2.node_count());
}
