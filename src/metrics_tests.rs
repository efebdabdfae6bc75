use super::*;

#[test]
fn fresh_metrics_snapshot_is_all_zero() {
    let m = Metrics::new();
    assert_eq!(m.snapshot(), MetricsSnapshot::default());
}

#[test]
fn record_methods_increment_their_own_counter_only() {
    let m = Metrics::new();
    m.record_traversal();
    m.record_match();
    m.record_snapshot_save();
    m.record_snapshot_load();
    let snap = m.snapshot();
    assert_eq!(snap.traversals, 1);
    assert_eq!(snap.matches, 1);
    assert_eq!(snap.snapshot_saves, 1);
    assert_eq!(snap.snapshot_loads, 1);
    assert_eq!(snap.edges_hydrated, 0);
}
