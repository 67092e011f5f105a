//! Record store
//!
//! The ordered list of requirement records, mirrored to a snapshot backend
//! after every mutation. Each mutation builds the new list, persists it and
//! only then replaces the in-memory list, so a failed save changes nothing.

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::db::SnapshotBackend;
use crate::models::RequirementRecord;

/// Minimum length of an id prefix accepted by [`RecordStore::resolve_id`]
pub const MIN_ID_PREFIX: usize = 4;

pub struct RecordStore {
    records: Vec<RequirementRecord>,
    backend: Box<dyn SnapshotBackend>,
}

impl RecordStore {
    /// Open a store, restoring the backend's snapshot once.
    ///
    /// A missing or empty snapshot yields an empty store. A snapshot that
    /// cannot be read is logged and also yields an empty store.
    pub fn open(backend: Box<dyn SnapshotBackend>) -> Self {
        let records = match backend.load() {
            Ok(Some(records)) if !records.is_empty() => {
                log::info!(
                    "Restored {} record(s) from {}",
                    records.len(),
                    backend.describe()
                );
                records
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                log::error!("Failed to restore saved records, starting empty: {:#}", e);
                Vec::new()
            }
        };

        Self { records, backend }
    }

    /// Records in display order
    pub fn records(&self) -> &[RequirementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&RequirementRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Position of a record in the list
    pub fn position(&self, id: &Uuid) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    /// The backend this store persists to
    pub fn backend(&self) -> &dyn SnapshotBackend {
        self.backend.as_ref()
    }

    /// Resolve a full UUID or a unique id prefix to a record id
    pub fn resolve_id(&self, id_str: &str) -> Result<Uuid> {
        let id_str = id_str.trim();
        if let Ok(uuid) = Uuid::parse_str(id_str) {
            return Ok(uuid);
        }

        if id_str.len() < MIN_ID_PREFIX {
            anyhow::bail!(
                "Invalid record ID: '{}'. Use a UUID or at least {} leading characters of one",
                id_str,
                MIN_ID_PREFIX
            );
        }

        let prefix = id_str.to_lowercase();
        let matches: Vec<Uuid> = self
            .records
            .iter()
            .map(|r| r.id)
            .filter(|id| id.to_string().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => anyhow::bail!("No record matches ID '{}'", id_str),
            _ => anyhow::bail!(
                "ID prefix '{}' is ambiguous ({} records match)",
                id_str,
                matches.len()
            ),
        }
    }

    /// Persist `next` and make it the current list
    fn commit(&mut self, next: Vec<RequirementRecord>) -> Result<()> {
        self.backend
            .save(&next)
            .with_context(|| format!("Failed to save records to {}", self.backend.describe()))?;
        self.records = next;
        Ok(())
    }

    /// Add records to the end of the list
    pub fn append(&mut self, records: Vec<RequirementRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut next = self.records.clone();
        next.extend(records);
        self.commit(next)
    }

    /// Remove the record with the given id. Returns false (and saves
    /// nothing) if no such record exists.
    pub fn delete(&mut self, id: &Uuid) -> Result<bool> {
        if self.position(id).is_none() {
            return Ok(false);
        }
        let next: Vec<RequirementRecord> = self
            .records
            .iter()
            .filter(|r| &r.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Clear every record and remove the snapshot entirely.
    ///
    /// Destructive; callers confirm with the user first.
    pub fn delete_all(&mut self) -> Result<()> {
        self.backend
            .clear()
            .with_context(|| {
                format!("Failed to remove snapshot from {}", self.backend.describe())
            })?;
        self.records.clear();
        Ok(())
    }

    /// Move the record at `from` to position `to`, shifting the others.
    ///
    /// Returns false without touching anything when `to` is outside
    /// `[0, len)` or `from` does not point at a record.
    pub fn reorder(&mut self, from: isize, to: isize) -> Result<bool> {
        let len = self.records.len() as isize;
        if to < 0 || to >= len || from < 0 || from >= len {
            return Ok(false);
        }
        if from == to {
            return Ok(true);
        }

        let mut next = self.records.clone();
        let moved = next.remove(from as usize);
        next.insert(to as usize, moved);
        self.commit(next)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileBackend, MemoryBackend};
    use crate::models::{DraftRow, Priority};
    use crate::ai::fallback_record;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(title: &str) -> RequirementRecord {
        fallback_record(&DraftRow {
            title_en: Some(title.to_string()),
            ..Default::default()
        })
    }

    fn titles(store: &RecordStore) -> Vec<String> {
        store.records().iter().map(|r| r.title_en.clone()).collect()
    }

    /// Backend wrapper sharing one MemoryBackend between store instances
    struct Shared(Arc<MemoryBackend>);

    impl SnapshotBackend for Shared {
        fn backend_type(&self) -> crate::db::BackendType {
            self.0.backend_type()
        }
        fn load(&self) -> Result<Option<Vec<RequirementRecord>>> {
            self.0.load()
        }
        fn save(&self, records: &[RequirementRecord]) -> Result<()> {
            self.0.save(records)
        }
        fn clear(&self) -> Result<()> {
            self.0.clear()
        }
        fn exists(&self) -> bool {
            self.0.exists()
        }
    }

    /// Backend whose writes always fail
    struct ReadOnly;

    impl SnapshotBackend for ReadOnly {
        fn backend_type(&self) -> crate::db::BackendType {
            crate::db::BackendType::Memory
        }
        fn load(&self) -> Result<Option<Vec<RequirementRecord>>> {
            Ok(None)
        }
        fn save(&self, _records: &[RequirementRecord]) -> Result<()> {
            anyhow::bail!("read-only")
        }
        fn clear(&self) -> Result<()> {
            anyhow::bail!("read-only")
        }
        fn exists(&self) -> bool {
            false
        }
    }

    fn store_with(titles: &[&str]) -> RecordStore {
        let mut store = RecordStore::open(Box::new(MemoryBackend::new()));
        store
            .append(titles.iter().map(|t| record(t)).collect())
            .unwrap();
        store
    }

    #[test]
    fn test_round_trip_through_snapshot() {
        let shared = Arc::new(MemoryBackend::new());
        let mut store = RecordStore::open(Box::new(Shared(shared.clone())));
        let mut high = record("b");
        high.priority = Priority::High;
        high.additional_data.push("Owner", None, "Dana");
        store.append(vec![record("a"), high, record("c")]).unwrap();

        let restored = RecordStore::open(Box::new(Shared(shared)));
        assert_eq!(restored.records(), store.records());
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");

        let mut store = RecordStore::open(Box::new(FileBackend::new(&path)));
        store.append(vec![record("one"), record("two")]).unwrap();

        let restored = RecordStore::open(Box::new(FileBackend::new(&path)));
        assert_eq!(restored.records(), store.records());
    }

    #[test]
    fn test_append_preserves_upload_order() {
        let mut store = store_with(&["a", "b"]);
        store.append(vec![record("c")]).unwrap();
        assert_eq!(titles(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_delete_by_id() {
        let mut store = store_with(&["a", "b", "c"]);
        let id = store.records()[1].id;

        assert!(store.delete(&id).unwrap());
        assert_eq!(titles(&store), vec!["a", "c"]);
        assert!(store.get(&id).is_none());

        // Absent id is a no-op
        assert!(!store.delete(&id).unwrap());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_delete_all_removes_snapshot() {
        let shared = Arc::new(MemoryBackend::new());
        let mut store = RecordStore::open(Box::new(Shared(shared.clone())));
        store.append(vec![record("a"), record("b")]).unwrap();
        assert!(shared.exists());

        store.delete_all().unwrap();
        assert!(store.is_empty());
        assert!(!shared.exists());

        let restored = RecordStore::open(Box::new(Shared(shared)));
        assert!(restored.is_empty());
    }

    #[test]
    fn test_reorder_moves_and_shifts() {
        let mut store = store_with(&["a", "b", "c", "d"]);

        assert!(store.reorder(0, 2).unwrap());
        assert_eq!(titles(&store), vec!["b", "c", "a", "d"]);

        assert!(store.reorder(3, 0).unwrap());
        assert_eq!(titles(&store), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_reorder_out_of_bounds_is_noop() {
        let mut store = store_with(&["a", "b", "c"]);

        assert!(!store.reorder(0, 3).unwrap());
        assert!(!store.reorder(0, -1).unwrap());
        assert!(!store.reorder(5, 1).unwrap());
        assert!(!store.reorder(-1, 1).unwrap());
        assert_eq!(titles(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reorder_is_persisted() {
        let shared = Arc::new(MemoryBackend::new());
        let mut store = RecordStore::open(Box::new(Shared(shared.clone())));
        store.append(vec![record("a"), record("b")]).unwrap();
        store.reorder(1, 0).unwrap();

        let restored = RecordStore::open(Box::new(Shared(shared)));
        assert_eq!(titles(&restored), vec!["b", "a"]);
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let store = RecordStore::open(Box::new(MemoryBackend::with_raw("{\"broken\": ")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_leaves_list_unchanged() {
        let mut store = RecordStore::open(Box::new(ReadOnly));
        assert!(store.append(vec![record("a")]).is_err());
        assert!(store.is_empty());
        assert!(store.delete_all().is_err());
    }

    #[test]
    fn test_resolve_id() {
        let store = store_with(&["a", "b"]);
        let id = store.records()[0].id;
        let full = id.to_string();

        assert_eq!(store.resolve_id(&full).unwrap(), id);
        assert_eq!(store.resolve_id(&full[..8].to_uppercase()).unwrap(), id);
        assert!(store.resolve_id("ab").is_err());
        assert!(store.resolve_id("zzzzzzzz").is_err());
    }
}
