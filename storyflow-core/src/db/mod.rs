//! Snapshot persistence for the record store
//!
//! This module provides a trait-based abstraction for storage backends,
//! so the record store can persist to a file, or to memory in tests,
//! through the same interface.

mod file_backend;
mod memory_backend;
mod traits;

pub use file_backend::FileBackend;
pub use memory_backend::MemoryBackend;
pub use traits::{BackendType, SnapshotBackend, SNAPSHOT_KEY};

use std::path::Path;

/// Creates a snapshot backend based on the file extension or explicit type
pub fn create_backend(path: &Path, backend_type: Option<BackendType>) -> Box<dyn SnapshotBackend> {
    let bt = backend_type.unwrap_or_else(|| {
        // Infer from file extension
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => BackendType::Yaml,
            _ => BackendType::Json,
        }
    });

    match bt {
        BackendType::Memory => Box::new(MemoryBackend::new()),
        format => Box::new(FileBackend::with_format(path, format)),
    }
}
