//! Arrow IPC edge-stream ingestion (C3).
//!
//! The teacher has no Arrow dependency of its own — its bulk loaders read
//! CSV/SQL rows directly into `graphstore/delta.rs`. The record-batch shape
//! here is grounded on `stormasm-ioxnu22july/read_buffer/src/table.rs`,
//! which walks `arrow::record_batch::RecordBatch` column-by-column the same
//! way `hydrate_batch` does below.

use std::io::Read;
use std::sync::atomic::Ordering;

use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::ipc::reader::StreamReader;
use arrow::record_batch::RecordBatch;

use crate::error::HydrationError;
use crate::interner::Interner;
use crate::metrics::Metrics;
use crate::topology::{Topology, VALID_FOREVER};

type HResult<T> = Result<T, HydrationError>;

/// Tunable knobs for a hydration pass. Kept as an explicit struct rather
/// than environment variables since this crate has no process lifecycle of
/// its own to read them from.
#[derive(Debug, Clone, Copy)]
pub struct HydrationConfig {
    /// Compact the topology once after the whole stream is consumed.
    pub compact_after: bool,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self { compact_after: true }
    }
}

/// Owns the edge-type dictionary alongside the node interner, since both are
/// populated as a side effect of hydration and queried the same way.
#[derive(Debug, Default)]
pub struct EdgeTypeDict {
    inner: Interner,
}

impl EdgeTypeDict {
    pub fn new() -> Self {
        Self { inner: Interner::new() }
    }

    pub fn intern(&mut self, s: &str) -> u32 {
        self.inner.intern(s)
    }

    pub fn resolve(&self, h: u32) -> Option<&str> {
        self.inner.resolve(h).ok()
    }

    pub fn interner(&self) -> &Interner {
        &self.inner
    }

    pub fn from_interner(inner: Interner) -> Self {
        Self { inner }
    }
}

/// Reads an Arrow IPC stream batch by batch, interning node identities and
/// edge types and inserting temporal edge records into `topology`. Each
/// batch is validated and applied atomically: a malformed batch stops
/// ingestion before any of its rows are inserted, but rows from prior
/// batches remain.
pub fn hydrate<R: Read>(
    reader: R,
    nodes: &mut Interner,
    etypes: &mut EdgeTypeDict,
    topology: &mut Topology,
    metrics: &Metrics,
    config: HydrationConfig,
) -> HResult<u64> {
    let stream = StreamReader::try_new(reader, None).map_err(|e| HydrationError::Decode { reason: e.to_string() })?;
    let mut total = 0u64;
    for batch in stream {
        let batch = batch.map_err(|e| HydrationError::Decode { reason: e.to_string() })?;
        total += hydrate_batch(&batch, nodes, etypes, topology)?;
    }
    metrics.edges_hydrated.fetch_add(total, Ordering::Relaxed);
    metrics.hydration_runs.fetch_add(1, Ordering::Relaxed);
    if config.compact_after {
        topology.compact();
        metrics.compactions.fetch_add(1, Ordering::Relaxed);
    }
    tracing::debug!(edges = total, "hydration pass complete");
    Ok(total)
}

fn hydrate_batch(
    batch: &RecordBatch,
    nodes: &mut Interner,
    etypes: &mut EdgeTypeDict,
    topology: &mut Topology,
) -> HResult<u64> {
    let schema = batch.schema();
    let source = string_column(batch, &schema, "source")?;
    let target = string_column(batch, &schema, "target")?;
    let etype = string_column(batch, &schema, "type")?;
    let valid_from = temporal_column(batch, &schema, "valid_from")?;
    let valid_to = temporal_column(batch, &schema, "valid_to")?;

    let n = batch.num_rows();
    // Stage into owned records first so a decode failure partway through
    // the batch leaves `topology` untouched (all-or-nothing per batch).
    let mut staged = Vec::with_capacity(n);
    for row in 0..n {
        if source.is_null(row) || target.is_null(row) || etype.is_null(row) {
            return Err(HydrationError::Decode { reason: format!("row {row}: null identity column") });
        }
        let src = source.value(row);
        let dst = target.value(row);
        let et = etype.value(row);
        let vf = valid_from.value_at(row).unwrap_or(0);
        let vt = valid_to.value_at(row).unwrap_or(VALID_FOREVER);
        if vf > vt {
            return Err(HydrationError::Decode { reason: format!("row {row}: valid_from > valid_to") });
        }
        staged.push((src, dst, et, vf, vt));
    }

    for (src, dst, et, vf, vt) in staged {
        let sh = nodes.intern(src);
        let dh = nodes.intern(dst);
        let eh = etypes.intern(et);
        topology.insert_edge(sh, dh, eh, vf, vt);
    }
    Ok(n as u64)
}

fn string_column<'a>(batch: &'a RecordBatch, schema: &arrow::datatypes::Schema, name: &str) -> HResult<&'a StringArray> {
    let idx = schema
        .index_of(name)
        .map_err(|_| HydrationError::Schema { reason: format!("missing column '{name}'") })?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| HydrationError::Schema { reason: format!("column '{name}' is not utf8") })
}

/// `valid_from`/`valid_to` may arrive as int64 microseconds or float64
/// seconds-since-epoch scaled elsewhere; the spec allows either, so this
/// wraps whichever Arrow array type is present behind one accessor.
enum TemporalColumn<'a> {
    Int(&'a Int64Array),
    Float(&'a Float64Array),
}

impl TemporalColumn<'_> {
    fn value_at(&self, row: usize) -> Option<i64> {
        match self {
            TemporalColumn::Int(a) => {
                if a.is_null(row) {
                    None
                } else {
                    Some(a.value(row))
                }
            }
            TemporalColumn::Float(a) => {
                if a.is_null(row) {
                    None
                } else {
                    Some(a.value(row) as i64)
                }
            }
        }
    }
}

fn temporal_column<'a>(batch: &'a RecordBatch, schema: &arrow::datatypes::Schema, name: &str) -> HResult<TemporalColumn<'a>> {
    let idx = schema
        .index_of(name)
        .map_err(|_| HydrationError::Schema { reason: format!("missing column '{name}'") })?;
    let col = batch.column(idx);
    match col.data_type() {
        DataType::Int64 => Ok(TemporalColumn::Int(col.as_any().downcast_ref::<Int64Array>().unwrap())),
        DataType::Float64 => Ok(TemporalColumn::Float(col.as_any().downcast_ref::<Float64Array>().unwrap())),
        other => Err(HydrationError::Schema { reason: format!("column '{name}' has unsupported type {other:?}") }),
    }
}

#[cfg(test)]
#[path = "hydrate_tests.rs"]
mod hydrate_tests;
