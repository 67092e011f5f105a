//! Import pipeline
//!
//! File → grid → draft rows → enriched records → store. Nothing reaches the
//! store unless the whole batch was produced.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ai::{enrich_rows_with_progress, EnrichmentService};
use crate::models::DraftRow;
use crate::parser::{self, Layout};
use crate::sheet;
use crate::store::RecordStore;

/// Reasons an upload is rejected
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Please upload a valid CSV or Excel file (.csv, .xlsx, .xls); got {0}")]
    UnsupportedExtension(String),

    #[error("Could not read {path:?}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("The file is empty")]
    Empty,

    #[error("No recognizable requirements found in the file")]
    NoRecognizableContent,

    #[error("Failed to save imported records: {0:#}")]
    Storage(anyhow::Error),
}

/// What one import did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub layout: Layout,
    /// Draft rows produced by normalization
    pub rows_parsed: usize,
    /// Rows with meaningful content
    pub rows_kept: usize,
    pub records_added: usize,
}

/// Import one spreadsheet into the store
pub fn import_file(
    path: &Path,
    service: &dyn EnrichmentService,
    store: &mut RecordStore,
) -> Result<ImportSummary, ImportError> {
    import_file_with_progress(path, service, store, |_, _| {})
}

/// Same as [`import_file`], reporting `progress(done, total)` per enriched row
pub fn import_file_with_progress<F>(
    path: &Path,
    service: &dyn EnrichmentService,
    store: &mut RecordStore,
    progress: F,
) -> Result<ImportSummary, ImportError>
where
    F: FnMut(usize, usize),
{
    let grid = sheet::load_grid(path)?;
    if grid.iter().all(|row| row.iter().all(|c| c.trim().is_empty())) {
        return Err(ImportError::Empty);
    }

    let parsed = parser::normalize(&grid);
    let rows_parsed = parsed.rows.len();

    let kept: Vec<DraftRow> = parsed
        .rows
        .into_iter()
        .filter(DraftRow::has_meaningful_content)
        .collect();

    if kept.is_empty() {
        return Err(ImportError::NoRecognizableContent);
    }

    log::info!(
        "Importing {} of {} row(s) from {} using {}",
        kept.len(),
        rows_parsed,
        path.display(),
        service.describe()
    );

    let records = enrich_rows_with_progress(service, &kept, progress);
    let records_added = records.len();
    store.append(records).map_err(ImportError::Storage)?;

    Ok(ImportSummary {
        layout: parsed.layout,
        rows_parsed,
        rows_kept: kept.len(),
        records_added,
    })
}
