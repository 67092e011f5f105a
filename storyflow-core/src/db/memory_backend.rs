//! In-memory key-value backend
//!
//! Holds the serialized snapshot in a map under [`SNAPSHOT_KEY`], the same
//! way a browser's local storage would. Mostly useful in tests.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{BackendType, SnapshotBackend, SNAPSHOT_KEY};
use crate::models::RequirementRecord;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with a raw snapshot string (may be corrupt)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.set_raw(raw);
        backend
    }

    /// Raw serialized snapshot, if any
    pub fn raw(&self) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(SNAPSHOT_KEY).cloned())
    }

    /// Overwrite the raw snapshot string
    pub fn set_raw(&self, raw: impl Into<String>) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(SNAPSHOT_KEY.to_string(), raw.into());
        }
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Snapshot map lock poisoned"))
    }
}

impl SnapshotBackend for MemoryBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Memory
    }

    fn load(&self) -> Result<Option<Vec<RequirementRecord>>> {
        let entries = self.entries()?;
        match entries.get(SNAPSHOT_KEY) {
            Some(raw) => {
                let records = serde_json::from_str(raw)
                    .with_context(|| {
                        format!("Failed to parse snapshot under key {}", SNAPSHOT_KEY)
                    })?;
                Ok(Some(records))
            }
            None => Ok(None),
        }
    }

    fn save(&self, records: &[RequirementRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.entries()?.insert(SNAPSHOT_KEY.to_string(), raw);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries()?.remove(SNAPSHOT_KEY);
        Ok(())
    }

    fn exists(&self) -> bool {
        self.entries
            .lock()
            .map(|map| map.contains_key(SNAPSHOT_KEY))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_backend_loads_none() {
        let backend = MemoryBackend::new();
        assert!(!backend.exists());
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_save_clear() {
        let backend = MemoryBackend::new();
        backend.save(&[]).unwrap();
        assert!(backend.exists());
        assert_eq!(backend.raw().as_deref(), Some("[]"));
        assert_eq!(backend.load().unwrap(), Some(Vec::new()));

        backend.clear().unwrap();
        assert!(!backend.exists());
        assert!(backend.raw().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let backend = MemoryBackend::with_raw("{not json");
        assert!(backend.load().is_err());
    }
}
