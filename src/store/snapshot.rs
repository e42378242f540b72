//! Snapshot persistence for the vector record store.
//!
//! A snapshot is a directory holding three files:
//!
//! - `manifest.json` - format version, generation counter, dimension,
//!   record count, save timestamp
//! - `vectors-<gen>.bin` - record vectors as little-endian f64, row-major
//!   (record count x dimension x 8 bytes)
//! - `records-<gen>.jsonl` - one JSON object per row with `{id, text,
//!   metadata}`, aligned with the vector rows
//!
//! Saves write the data files for a fresh generation first and commit by
//! atomically renaming a new manifest over the old one. Until that rename
//! happens the previous manifest still points at the previous generation's
//! files, which are never touched, so a crash mid-save leaves the last
//! committed snapshot loadable. Stale generations are cleaned up after the
//! commit.

use crate::error::{MinneError, Result};
use crate::store::{Metadata, Record, VectorRecordStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

const MANIFEST_FILE: &str = "manifest.json";
const SNAPSHOT_VERSION: u32 = 1;

/// Commit record for a snapshot directory.
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    generation: u64,
    dimension: Option<usize>,
    record_count: usize,
    saved_at: DateTime<Utc>,
}

/// One side-table row: everything about a record except its vector.
#[derive(Debug, Serialize, Deserialize)]
struct SideEntry {
    id: Uuid,
    text: String,
    #[serde(default)]
    metadata: Metadata,
}

fn vectors_file(generation: u64) -> String {
    format!("vectors-{:06}.bin", generation)
}

fn records_file(generation: u64) -> String {
    format!("records-{:06}.jsonl", generation)
}

/// Persist the live records of `store` under `path`.
///
/// The directory is created if absent. On error the previously committed
/// snapshot, if any, is still intact and loadable.
pub fn save(store: &VectorRecordStore, path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| persistence(format!("create snapshot directory {}: {}", path.display(), e)))?;

    let generation = next_generation(path);
    let live: Vec<&Record> = store.iter_live().collect();

    write_vectors(&path.join(vectors_file(generation)), &live)?;
    write_side_table(&path.join(records_file(generation)), &live)?;

    let manifest = Manifest {
        version: SNAPSHOT_VERSION,
        generation,
        dimension: store.dimension(),
        record_count: live.len(),
        saved_at: Utc::now(),
    };
    commit_manifest(path, &manifest)?;

    cleanup_stale_generations(path, generation);

    debug!(
        "Saved snapshot generation {} ({} records) to {}",
        generation,
        live.len(),
        path.display()
    );
    Ok(())
}

/// Load a store from the snapshot at `path`.
///
/// Returns [`MinneError::SnapshotNotFound`] if no manifest exists there and
/// [`MinneError::CorruptSnapshot`] if the snapshot is present but
/// unreadable or internally inconsistent.
pub fn load(path: &Path) -> Result<VectorRecordStore> {
    let manifest_path = path.join(MANIFEST_FILE);
    let raw = match fs::read_to_string(&manifest_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MinneError::SnapshotNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(persistence(format!(
                "read manifest {}: {}",
                manifest_path.display(),
                e
            )));
        }
    };

    let manifest: Manifest = serde_json::from_str(&raw)
        .map_err(|e| MinneError::CorruptSnapshot(format!("unreadable manifest: {}", e)))?;
    if manifest.version != SNAPSHOT_VERSION {
        return Err(MinneError::CorruptSnapshot(format!(
            "unsupported snapshot version {}",
            manifest.version
        )));
    }
    if manifest.record_count > 0 && manifest.dimension.is_none() {
        return Err(MinneError::CorruptSnapshot(
            "records present but no dimension recorded".to_string(),
        ));
    }

    let side = read_side_table(&path.join(records_file(manifest.generation)))?;
    if side.len() != manifest.record_count {
        return Err(MinneError::CorruptSnapshot(format!(
            "manifest declares {} records but side table has {}",
            manifest.record_count,
            side.len()
        )));
    }

    let dimension = manifest.dimension.unwrap_or(0);
    let vectors = read_vectors(
        &path.join(vectors_file(manifest.generation)),
        manifest.record_count,
        dimension,
    )?;

    let records: Vec<Record> = side
        .into_iter()
        .zip(vectors)
        .map(|(entry, vector)| Record {
            id: entry.id,
            vector,
            text: entry.text,
            metadata: entry.metadata,
        })
        .collect();

    Ok(VectorRecordStore::from_records(manifest.dimension, records))
}

/// Delete the snapshot directory, if it exists.
pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(persistence(format!(
            "remove snapshot {}: {}",
            path.display(),
            e
        ))),
    }
}

fn persistence(msg: String) -> MinneError {
    MinneError::Persistence(msg)
}

/// Pick the generation number for the next save.
///
/// Normally the committed manifest's generation plus one; if the manifest is
/// missing or unreadable, step past any stray data files instead so a new
/// save never collides with leftovers from an interrupted one.
fn next_generation(path: &Path) -> u64 {
    let manifest_path = path.join(MANIFEST_FILE);
    if let Ok(raw) = fs::read_to_string(&manifest_path) {
        if let Ok(manifest) = serde_json::from_str::<Manifest>(&raw) {
            return manifest.generation + 1;
        }
    }

    let mut max = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            if let Some(generation) = parse_generation(&entry.file_name().to_string_lossy()) {
                max = max.max(generation);
            }
        }
    }
    max + 1
}

fn parse_generation(name: &str) -> Option<u64> {
    let rest = name
        .strip_prefix("vectors-")
        .or_else(|| name.strip_prefix("records-"))?;
    let digits = rest
        .strip_suffix(".bin")
        .or_else(|| rest.strip_suffix(".jsonl"))?;
    digits.parse().ok()
}

fn write_vectors(path: &Path, records: &[&Record]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| persistence(format!("create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        for &component in &record.vector {
            writer
                .write_all(&f64::from(component).to_le_bytes())
                .map_err(|e| persistence(format!("write {}: {}", path.display(), e)))?;
        }
    }

    writer
        .flush()
        .map_err(|e| persistence(format!("flush {}: {}", path.display(), e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| persistence(format!("sync {}: {}", path.display(), e)))?;
    Ok(())
}

fn write_side_table(path: &Path, records: &[&Record]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| persistence(format!("create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        let entry = SideEntry {
            id: record.id,
            text: record.text.clone(),
            metadata: record.metadata.clone(),
        };
        let line = serde_json::to_string(&entry)
            .map_err(|e| persistence(format!("encode record {}: {}", record.id, e)))?;
        writeln!(writer, "{}", line)
            .map_err(|e| persistence(format!("write {}: {}", path.display(), e)))?;
    }

    writer
        .flush()
        .map_err(|e| persistence(format!("flush {}: {}", path.display(), e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| persistence(format!("sync {}: {}", path.display(), e)))?;
    Ok(())
}

fn commit_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(path)
        .map_err(|e| persistence(format!("create manifest temp file: {}", e)))?;
    serde_json::to_writer_pretty(tmp.as_file_mut(), manifest)
        .map_err(|e| persistence(format!("encode manifest: {}", e)))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| persistence(format!("sync manifest: {}", e)))?;
    tmp.persist(path.join(MANIFEST_FILE))
        .map_err(|e| persistence(format!("commit manifest: {}", e)))?;
    Ok(())
}

/// Best-effort removal of data files from other generations.
fn cleanup_stale_generations(path: &Path, keep: u64) {
    let Ok(entries) = fs::read_dir(path) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(generation) = parse_generation(&name) {
            if generation != keep {
                if let Err(e) = fs::remove_file(entry.path()) {
                    debug!("Failed to remove stale snapshot file {}: {}", name, e);
                }
            }
        }
    }
}

fn read_side_table(path: &Path) -> Result<Vec<SideEntry>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MinneError::CorruptSnapshot(format!(
                "side table {} is missing",
                path.display()
            )));
        }
        Err(e) => return Err(persistence(format!("open {}: {}", path.display(), e))),
    };

    let mut entries = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| persistence(format!("read {}: {}", path.display(), e)))?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: SideEntry = serde_json::from_str(&line).map_err(|e| {
            MinneError::CorruptSnapshot(format!(
                "bad side table entry at line {}: {}",
                line_no + 1,
                e
            ))
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn read_vectors(path: &Path, record_count: usize, dimension: usize) -> Result<Vec<Vec<f32>>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MinneError::CorruptSnapshot(format!(
                "vector file {} is missing",
                path.display()
            )));
        }
        Err(e) => return Err(persistence(format!("read {}: {}", path.display(), e))),
    };

    let expected = record_count * dimension * 8;
    if bytes.len() != expected {
        return Err(MinneError::CorruptSnapshot(format!(
            "vector file holds {} bytes, expected {} ({} records x {} dims)",
            bytes.len(),
            expected,
            record_count,
            dimension
        )));
    }

    if record_count == 0 {
        return Ok(Vec::new());
    }

    let mut components = Vec::with_capacity(record_count * dimension);
    for chunk in bytes.chunks_exact(8) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        components.push(f64::from_le_bytes(buf) as f32);
    }

    Ok(components.chunks(dimension).map(|row| row.to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(source: &str) -> Metadata {
        let mut m = Metadata::new();
        m.insert("source".to_string(), source.into());
        m
    }

    fn store_with(texts: &[&str]) -> VectorRecordStore {
        let mut store = VectorRecordStore::new();
        let entries = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                (
                    vec![i as f32, 1.0, 0.25 + i as f32],
                    text.to_string(),
                    meta("unit"),
                )
            })
            .collect();
        store.add(entries).unwrap();
        store
    }

    #[test]
    fn test_round_trip_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorRecordStore::new();

        save(&store, dir.path()).unwrap();
        let loaded = load(dir.path()).unwrap();

        assert!(loaded.is_empty());
        assert_eq!(loaded.dimension(), None);
    }

    #[test]
    fn test_round_trip_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&["one", "two", "three"]);

        save(&store, dir.path()).unwrap();
        let loaded = load(dir.path()).unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.dimension(), Some(3));

        let before: Vec<&Record> = store.iter_live().collect();
        let after: Vec<&Record> = loaded.iter_live().collect();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.id, a.id);
            assert_eq!(b.text, a.text);
            assert_eq!(b.vector, a.vector);
            assert_eq!(b.metadata, a.metadata);
        }
    }

    #[test]
    fn test_round_trip_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&["only"]);

        save(&store, dir.path()).unwrap();
        let loaded = load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.iter_live().next().unwrap().text, "only");
    }

    #[test]
    fn test_save_compacts_tombstones() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&["keep", "drop"]);
        let drop_id = store
            .iter_live()
            .find(|r| r.text == "drop")
            .map(|r| r.id)
            .unwrap();
        store.delete(&[drop_id]);

        save(&store, dir.path()).unwrap();
        let mut loaded = load(dir.path()).unwrap();

        assert_eq!(loaded.len(), 1);
        // The tombstoned record is gone entirely, not just hidden.
        assert_eq!(loaded.delete(&[drop_id]), 0);
        // The dimension survives even though one record was dropped.
        assert_eq!(loaded.dimension(), Some(3));
    }

    #[test]
    fn test_load_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("never-saved")).unwrap_err();
        assert!(matches!(err, MinneError::SnapshotNotFound(_)));

        // Directory exists but holds no manifest.
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, MinneError::SnapshotNotFound(_)));
    }

    #[test]
    fn test_load_corrupt_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "not json at all").unwrap();

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, MinneError::CorruptSnapshot(_)));
    }

    #[test]
    fn test_load_detects_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&["one", "two"]);
        save(&store, dir.path()).unwrap();

        // Drop one line from the side table.
        let side_path = dir.path().join(records_file(1));
        let content = fs::read_to_string(&side_path).unwrap();
        let first_line = content.lines().next().unwrap().to_string();
        fs::write(&side_path, format!("{}\n", first_line)).unwrap();

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, MinneError::CorruptSnapshot(_)));
    }

    #[test]
    fn test_load_detects_truncated_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&["one", "two"]);
        save(&store, dir.path()).unwrap();

        let vec_path = dir.path().join(vectors_file(1));
        let bytes = fs::read(&vec_path).unwrap();
        fs::write(&vec_path, &bytes[..bytes.len() - 8]).unwrap();

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, MinneError::CorruptSnapshot(_)));
    }

    #[test]
    fn test_second_save_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        save(&store_with(&["first"]), dir.path()).unwrap();
        save(&store_with(&["second", "third"]), dir.path()).unwrap();

        let loaded = load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);

        // Generation 1 files were removed after the commit.
        assert!(!dir.path().join(vectors_file(1)).exists());
        assert!(!dir.path().join(records_file(1)).exists());
        assert!(dir.path().join(vectors_file(2)).exists());
    }

    #[test]
    fn test_uncommitted_generation_is_ignored() {
        // Simulates a crash after data files were written but before the
        // manifest rename: the old snapshot must still load.
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&["committed"]);
        save(&store, dir.path()).unwrap();

        fs::write(dir.path().join(vectors_file(2)), [0u8; 24]).unwrap();
        fs::write(dir.path().join(records_file(2)), "garbage\n").unwrap();

        let loaded = load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.iter_live().next().unwrap().text, "committed");

        // A later save reclaims the stray generation.
        save(&store_with(&["next"]), dir.path()).unwrap();
        let loaded = load(dir.path()).unwrap();
        assert_eq!(loaded.iter_live().next().unwrap().text, "next");
    }

    #[test]
    fn test_remove_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection");
        save(&store_with(&["gone"]), &path).unwrap();

        remove(&path).unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, MinneError::SnapshotNotFound(_)));

        // Removing twice is fine.
        remove(&path).unwrap();
    }
}
