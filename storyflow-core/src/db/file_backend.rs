//! File snapshot backend
//!
//! Stores the record list in a single JSON or YAML file, guarded by an
//! advisory lock on a sibling `.lock` file so two processes never interleave
//! a read and a write.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::traits::{BackendType, SnapshotBackend};
use crate::models::RequirementRecord;

/// How long to wait for another process to release the lock
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Delay between lock attempts
const LOCK_RETRY: Duration = Duration::from_millis(100);

/// Single-file snapshot backend
pub struct FileBackend {
    file_path: PathBuf,
    lock_file_path: PathBuf,
    format: BackendType,
}

impl FileBackend {
    /// Creates a backend for the given path, choosing the format from the
    /// extension (`.yaml`/`.yml` → YAML, anything else → JSON)
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let format = match file_path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => BackendType::Yaml,
            _ => BackendType::Json,
        };
        Self::with_format(file_path, format)
    }

    /// Creates a backend with an explicit format
    pub fn with_format<P: AsRef<Path>>(file_path: P, format: BackendType) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let mut lock_name = file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        lock_name.push(".lock");
        let lock_file_path = file_path.with_file_name(lock_name);

        Self {
            file_path,
            lock_file_path,
            format,
        }
    }

    /// Returns the path to the snapshot file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Acquire an exclusive lock on the file for writing
    /// Returns the lock file handle which must be held during the operation
    fn acquire_write_lock(&self) -> Result<File> {
        if let Some(parent) = self.lock_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to create lock file: {:?}", self.lock_file_path))?;

        self.wait_for(|| FileExt::try_lock_exclusive(&lock_file))?;
        Ok(lock_file)
    }

    /// Acquire a shared lock on the file for reading
    fn acquire_read_lock(&self) -> Result<Option<File>> {
        if !self.lock_file_path.exists() {
            return Ok(None);
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to open lock file: {:?}", self.lock_file_path))?;

        self.wait_for(|| FileExt::try_lock_shared(&lock_file))?;
        Ok(Some(lock_file))
    }

    fn wait_for<F>(&self, mut try_lock: F) -> Result<()>
    where
        F: FnMut() -> std::io::Result<()>,
    {
        let start = Instant::now();
        loop {
            match try_lock() {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if start.elapsed() > LOCK_TIMEOUT {
                        anyhow::bail!(
                            "Timeout waiting for snapshot lock (another writer?): {:?}",
                            self.file_path
                        );
                    }
                    std::thread::sleep(LOCK_RETRY);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to acquire lock on {:?}", self.lock_file_path)
                    })
                }
            }
        }
    }

    fn serialize(&self, records: &[RequirementRecord]) -> Result<String> {
        Ok(match self.format {
            BackendType::Yaml => serde_yaml::to_string(records)?,
            _ => serde_json::to_string_pretty(records)?,
        })
    }
}

impl SnapshotBackend for FileBackend {
    fn backend_type(&self) -> BackendType {
        self.format
    }

    fn load(&self) -> Result<Option<Vec<RequirementRecord>>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let _lock = self.acquire_read_lock()?;

        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open snapshot: {:?}", self.file_path))?;
        let reader = BufReader::new(file);

        let records: Vec<RequirementRecord> = match self.format {
            BackendType::Yaml => serde_yaml::from_reader(reader)
                .with_context(|| format!("Failed to parse YAML from {:?}", self.file_path))?,
            _ => serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse JSON from {:?}", self.file_path))?,
        };

        Ok(Some(records))
    }

    fn save(&self, records: &[RequirementRecord]) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut lock_file = self.acquire_write_lock()?;

        // Lock holder info, for debugging only
        let _ = writeln!(
            lock_file,
            "Locked by PID {} at {}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );

        let content = self.serialize(records)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write snapshot: {:?}", self.file_path))?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let _lock = self.acquire_write_lock()?;

        if self.file_path.exists() {
            fs::remove_file(&self.file_path)
                .with_context(|| format!("Failed to remove snapshot: {:?}", self.file_path))?;
        }
        Ok(())
    }

    fn exists(&self) -> bool {
        self.file_path.exists()
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.format, self.file_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdditionalData, Priority};
    use crate::lang::Language;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn sample() -> Vec<RequirementRecord> {
        let mut extra = AdditionalData::new();
        extra.push("Scenario", Some(Language::Ar), "سيناريو");
        vec![RequirementRecord {
            id: Uuid::new_v4(),
            title_en: "Login".to_string(),
            title_ar: "تسجيل الدخول".to_string(),
            description_en: "As a user".to_string(),
            description_ar: String::new(),
            classification: "Auth".to_string(),
            priority: Priority::Low,
            additional_data: extra,
        }]
    }

    #[test]
    fn test_missing_file_loads_none() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("snapshot.json"));
        assert!(!backend.exists());
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_json_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("nested/snapshot.json"));
        assert_eq!(backend.backend_type(), BackendType::Json);

        let records = sample();
        backend.save(&records).unwrap();
        assert!(backend.exists());
        assert_eq!(backend.load().unwrap(), Some(records));
    }

    #[test]
    fn test_yaml_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("snapshot.yaml"));
        assert_eq!(backend.backend_type(), BackendType::Yaml);

        let records = sample();
        backend.save(&records).unwrap();
        let raw = fs::read_to_string(backend.path()).unwrap();
        assert!(raw.contains("titleEn: Login"));
        assert_eq!(backend.load().unwrap(), Some(records));
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("snapshot.json"));
        backend.save(&sample()).unwrap();

        backend.clear().unwrap();
        assert!(!backend.exists());
        assert!(backend.load().unwrap().is_none());

        // Clearing twice is fine
        backend.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        fs::write(&path, "[{\"id\": 42").unwrap();

        let backend = FileBackend::new(&path);
        assert!(backend.load().is_err());
    }

    #[test]
    fn test_lock_file_sits_next_to_snapshot() {
        let backend = FileBackend::new("/tmp/data/snapshot.json");
        assert_eq!(
            backend.lock_file_path,
            PathBuf::from("/tmp/data/snapshot.json.lock")
        );
    }
}
