use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;

use super::*;

fn encode_batch(rows: &[(&str, &str, &str, i64, i64)]) -> Vec<u8> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("source", DataType::Utf8, false),
        Field::new("target", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("valid_from", DataType::Int64, true),
        Field::new("valid_to", DataType::Int64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.0).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.1).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.2).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.3).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.4).collect::<Vec<_>>())),
        ],
    )
    .unwrap();

    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, &schema).unwrap();
        writer.write(&batch).unwrap();
        writer.finish().unwrap();
    }
    buf
}

#[test]
fn hydrate_inserts_edges_from_a_single_batch() {
    let bytes = encode_batch(&[("a", "b", "knows", 0, VALID_FOREVER), ("b", "c", "knows", 0, VALID_FOREVER)]);
    let mut nodes = Interner::new();
    let mut etypes = EdgeTypeDict::new();
    let mut topo = Topology::new();
    let metrics = Metrics::new();

    let n = hydrate(bytes.as_slice(), &mut nodes, &mut etypes, &mut topo, &metrics, HydrationConfig::default()).unwrap();

    assert_eq!(n, 2);
    let a = nodes.lookup("a").unwrap();
    let b = nodes.lookup("b").unwrap();
    let et = etypes.intern("knows");
    assert_eq!(topo.active_out(a, et, i64::MAX), vec![b]);
}

#[test]
fn hydrate_rejects_batch_missing_required_column() {
    let schema = Arc::new(Schema::new(vec![Field::new("source", DataType::Utf8, false)]));
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(StringArray::from(vec!["a"]))]).unwrap();
    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, &schema).unwrap();
        writer.write(&batch).unwrap();
        writer.finish().unwrap();
    }

    let mut nodes = Interner::new();
    let mut etypes = EdgeTypeDict::new();
    let mut topo = Topology::new();
    let metrics = Metrics::new();

    let err = hydrate(buf.as_slice(), &mut nodes, &mut etypes, &mut topo, &metrics, HydrationConfig::default()).unwrap_err();
    assert!(matches!(err, HydrationError::Schema { .. }));
}

#[test]
fn hydrate_rejects_inverted_temporal_window() {
    let bytes = encode_batch(&[("a", "b", "knows", 100, 0)]);
    let mut nodes = Interner::new();
    let mut etypes = EdgeTypeDict::new();
    let mut topo = Topology::new();
    let metrics = Metrics::new();

    let err = hydrate(bytes.as_slice(), &mut nodes, &mut etypes, &mut topo, &metrics, HydrationConfig::default()).unwrap_err();
    assert!(matches!(err, HydrationError::Decode { .. }));
    assert_eq!(nodes.len(), 0, "rejected batch must not mutate the interner");
}

#[test]
fn hydrate_bumps_metrics_counters() {
    let bytes = encode_batch(&[("a", "b", "knows", 0, VALID_FOREVER)]);
    let mut nodes = Interner::new();
    let mut etypes = EdgeTypeDict::new();
    let mut topo = Topology::new();
    let metrics = Metrics::new();

    hydrate(bytes.as_slice(), &mut nodes, &mut etypes, &mut topo, &metrics, HydrationConfig::default()).unwrap();

    let snap = metrics.snapshot();
    assert_eq!(snap.edges_hydrated, 1);
    assert_eq!(snap.hydration_runs, 1);
    assert_eq!(snap.compactions, 1);
}
