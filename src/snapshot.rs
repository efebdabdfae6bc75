//! Binary snapshot codec (C6).
//!
//! Layout (little-endian throughout): 4-byte magic `QGPH`, `u16` version,
//! 2 reserved flag bytes, node and edge-type string tables, `node_count`,
//! per-node outgoing edge records, per-node incoming edge records,
//! `tombstone_words` followed by that many `u64` tombstone-bitset words,
//! then a trailing `u64` xxh3 checksum of every byte that precedes it.
//!
//! The on-disk layout and save discipline — write to a `.tmp` sibling,
//! `fsync`, then atomically rename into place — are grounded on the
//! teacher's `graphstore/manifest.rs`, which does the same dance for its
//! manifest file. `checksum` validation before trusting any offset mirrors
//! `graphstore/segments.rs`'s `AdjSegment::open`, which never reads past
//! its header until the CRC matches; this codec uses `xxhash-rust`'s xxh3
//! instead of the teacher's crc32, since xxh3 is the exact checksum the
//! wire format of this component calls for.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;

use crate::error::SnapshotError;
use crate::interner::Interner;
use crate::metrics::Metrics;
use crate::topology::{EdgeRecord, Topology};

type SResult<T> = Result<T, SnapshotError>;

const MAGIC: [u8; 4] = *b"QGPH";
const VERSION: u16 = 1;

/// Writes `nodes`, `etypes`, and `topology`'s outgoing and incoming
/// adjacency to `path` atomically: the body is written to
/// `path.with_extension("tmp")`, fsynced, then the tmp file is renamed
/// over `path`. A reader can never observe a partially written snapshot.
pub fn save(path: &Path, nodes: &Interner, etypes: &Interner, topology: &Topology, metrics: &Metrics) -> SResult<()> {
    let body = encode(nodes, etypes, topology);
    let tmp_path = tmp_sibling(path);
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&body)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    metrics.record_snapshot_save();
    tracing::debug!(path = %path.display(), bytes = body.len(), "snapshot saved");
    Ok(())
}

/// Memory-maps `path`, validates the header and checksum, then decodes.
/// Returns [`SnapshotError::Corrupt`] on any structural inconsistency
/// before trusting a single offset derived from the file's contents.
pub fn load(path: &Path, metrics: &Metrics) -> SResult<(Interner, Interner, Topology)> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    let result = decode(&mmap)?;
    metrics.record_snapshot_load();
    tracing::debug!(path = %path.display(), "snapshot loaded");
    Ok(result)
}

fn tmp_sibling(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    tmp.into()
}

/// Encodes in spec.md §4.6's exact field order: header, interner tables,
/// node count, outgoing adjacency, incoming adjacency, tombstone bitset,
/// then a trailing checksum computed over every byte that precedes it.
fn encode(nodes: &Interner, etypes: &Interner, topology: &Topology) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&[0u8; 2]); // reserved flags

    write_strings(&mut out, nodes.iter());
    write_strings(&mut out, etypes.iter());

    let node_count = nodes.len();
    write_u32(&mut out, node_count as u32);

    for h in 0..node_count as u32 {
        write_records(&mut out, topology.outgoing_records(h));
    }
    for h in 0..node_count as u32 {
        write_records(&mut out, topology.incoming_records(h));
    }

    let tombstone_words = tombstone_word_count(node_count);
    write_u32(&mut out, tombstone_words as u32);
    let mut words = vec![0u64; tombstone_words];
    for h in 0..node_count as u32 {
        if topology.is_tombstoned(h) {
            words[(h / 64) as usize] |= 1u64 << (h % 64);
        }
    }
    for w in &words {
        out.extend_from_slice(&w.to_le_bytes());
    }

    let checksum = xxhash_rust::xxh3::xxh3_64(&out);
    out.extend_from_slice(&checksum.to_le_bytes());
    out
}

fn write_records(out: &mut Vec<u8>, records: &[EdgeRecord]) {
    write_u32(out, records.len() as u32);
    for rec in records {
        write_u32(out, rec.endpoint);
        write_u32(out, rec.etype);
        out.extend_from_slice(&rec.valid_from_us.to_le_bytes());
        out.extend_from_slice(&rec.valid_to_us.to_le_bytes());
    }
}

fn tombstone_word_count(node_count: usize) -> usize {
    (node_count + 63) / 64
}

fn decode(data: &[u8]) -> SResult<(Interner, Interner, Topology)> {
    const HEADER_LEN: usize = 8; // magic + version + flags
    if data.len() < HEADER_LEN + 8 {
        return Err(SnapshotError::Corrupt { reason: "file shorter than header".into() });
    }
    if data[0..4] != MAGIC {
        return Err(SnapshotError::Corrupt { reason: "bad magic".into() });
    }
    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != VERSION {
        return Err(SnapshotError::Version { found: version, expected: VERSION });
    }

    let checksum_at = data.len() - 8;
    let checksum = u64::from_le_bytes(data[checksum_at..].try_into().unwrap());
    let preceding = &data[..checksum_at];
    if xxhash_rust::xxh3::xxh3_64(preceding) != checksum {
        return Err(SnapshotError::Corrupt { reason: "checksum mismatch".into() });
    }

    let mut cursor = &preceding[HEADER_LEN..];
    let node_strings = read_strings(&mut cursor)?;
    let etype_strings = read_strings(&mut cursor)?;
    let node_count = read_u32(&mut cursor)? as usize;
    if node_count != node_strings.len() {
        return Err(SnapshotError::Corrupt { reason: "node count does not match interner entries".into() });
    }

    let mut topology = Topology::new();
    if node_count > 0 {
        topology.ensure_capacity(node_count as u32 - 1);
    }

    for h in 0..node_count as u32 {
        let records = read_records(&mut cursor)?;
        topology.set_outgoing(h, records);
    }
    for h in 0..node_count as u32 {
        let records = read_records(&mut cursor)?;
        topology.set_incoming(h, records);
    }

    let tombstone_words = read_u32(&mut cursor)? as usize;
    let expected_words = tombstone_word_count(node_count);
    if tombstone_words != expected_words {
        return Err(SnapshotError::Corrupt { reason: "tombstone word count does not match node count".into() });
    }
    if cursor.len() < tombstone_words * 8 {
        return Err(SnapshotError::Corrupt { reason: "truncated tombstone bitset".into() });
    }
    for h in 0..node_count as u32 {
        let word_idx = (h as usize / 64) * 8;
        let word = u64::from_le_bytes(cursor[word_idx..word_idx + 8].try_into().unwrap());
        if word & (1u64 << (h % 64)) != 0 {
            topology.tombstone_node(h);
        }
    }

    let nodes = Interner::from_ordered(node_strings);
    let etypes = Interner::from_ordered(etype_strings);
    Ok((nodes, etypes, topology))
}

fn read_records(cursor: &mut &[u8]) -> SResult<Vec<EdgeRecord>> {
    let count = read_u32(cursor)? as usize;
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let endpoint = read_u32(cursor)?;
        let etype = read_u32(cursor)?;
        let valid_from_us = read_i64(cursor)?;
        let valid_to_us = read_i64(cursor)?;
        records.push(EdgeRecord { endpoint, etype, valid_from_us, valid_to_us });
    }
    Ok(records)
}

fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn write_strings<'a>(out: &mut Vec<u8>, strings: impl Iterator<Item = &'a str>) {
    let strings: Vec<&str> = strings.collect();
    write_u32(out, strings.len() as u32);
    for s in strings {
        write_u32(out, s.len() as u32);
        out.extend_from_slice(s.as_bytes());
    }
}

fn read_u32(cursor: &mut &[u8]) -> SResult<u32> {
    if cursor.len() < 4 {
        return Err(SnapshotError::Corrupt { reason: "truncated u32".into() });
    }
    let (head, tail) = cursor.split_at(4);
    *cursor = tail;
    Ok(u32::from_le_bytes(head.try_into().unwrap()))
}

fn read_i64(cursor: &mut &[u8]) -> SResult<i64> {
    if cursor.len() < 8 {
        return Err(SnapshotError::Corrupt { reason: "truncated i64".into() });
    }
    let (head, tail) = cursor.split_at(8);
    *cursor = tail;
    Ok(i64::from_le_bytes(head.try_into().unwrap()))
}

fn read_strings(cursor: &mut &[u8]) -> SResult<Vec<Box<str>>> {
    let count = read_u32(cursor)? as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let len = read_u32(cursor)? as usize;
        if cursor.len() < len {
            return Err(SnapshotError::Corrupt { reason: "truncated string table".into() });
        }
        let (head, tail) = cursor.split_at(len);
        let s = std::str::from_utf8(head).map_err(|_| SnapshotError::Corrupt { reason: "non-utf8 string".into() })?;
        out.push(Box::from(s));
        *cursor = tail;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
