//! Snapshot backend traits
//!
//! This module defines the repository interface the record store persists
//! through. A backend stores the whole record list as one snapshot.

use anyhow::Result;

use crate::models::RequirementRecord;

/// Key the snapshot is stored under
pub const SNAPSHOT_KEY: &str = "storyflow_persistent_data";

/// Types of snapshot backends available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// JSON file storage (single file)
    Json,
    /// YAML file storage (single file)
    Yaml,
    /// In-process key-value map
    Memory,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendType::Json => write!(f, "JSON"),
            BackendType::Yaml => write!(f, "YAML"),
            BackendType::Memory => write!(f, "Memory"),
        }
    }
}

/// Core trait for snapshot backends
///
/// `load()` and `save()` always work with the complete record list, so a
/// save is an atomic replacement of the previous snapshot.
pub trait SnapshotBackend: Send + Sync {
    /// Returns the backend type
    fn backend_type(&self) -> BackendType;

    /// Loads the snapshot; `None` when nothing has been stored
    fn load(&self) -> Result<Option<Vec<RequirementRecord>>>;

    /// Replaces the snapshot with the given records
    fn save(&self, records: &[RequirementRecord]) -> Result<()>;

    /// Removes the snapshot entirely
    fn clear(&self) -> Result<()>;

    /// Returns true if a snapshot is currently stored
    fn exists(&self) -> bool;

    /// Short description for logs and `config show`
    fn describe(&self) -> String {
        self.backend_type().to_string()
    }
}
