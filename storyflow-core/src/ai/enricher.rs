//! Row enrichment
//!
//! Turns draft rows into requirement records, one service request per row.
//! A row whose request fails keeps its sheet values instead.

use uuid::Uuid;

use crate::ai::client::AiError;
use crate::ai::responses::EnrichedFields;
use crate::models::{
    DraftRow, Priority, RequirementRecord, DEFAULT_CLASSIFICATION, UNTITLED_AR, UNTITLED_EN,
};

/// Capability to translate and complete a draft row
pub trait EnrichmentService {
    /// False when no credential or backend is configured; every row then
    /// takes the fallback path without a request
    fn is_available(&self) -> bool;

    /// Short human-readable name for logs
    fn describe(&self) -> String {
        "enrichment service".to_string()
    }

    fn enrich(&self, row: &DraftRow) -> Result<EnrichedFields, AiError>;
}

/// Enrich every row in order. Never fails: rows the service cannot handle
/// fall back to their sheet values.
pub fn enrich_rows(service: &dyn EnrichmentService, rows: &[DraftRow]) -> Vec<RequirementRecord> {
    enrich_rows_with_progress(service, rows, |_, _| {})
}

/// Same as [`enrich_rows`], calling `progress(done, total)` after each row
pub fn enrich_rows_with_progress<F>(
    service: &dyn EnrichmentService,
    rows: &[DraftRow],
    mut progress: F,
) -> Vec<RequirementRecord>
where
    F: FnMut(usize, usize),
{
    let total = rows.len();
    let available = service.is_available();
    if !available {
        log::warn!(
            "{} is not configured; keeping sheet values for {} row(s)",
            service.describe(),
            total
        );
    }

    let mut records = Vec::with_capacity(total);
    for (idx, row) in rows.iter().enumerate() {
        let record = if available {
            match service.enrich(row) {
                Ok(fields) => record_from_response(row, fields),
                Err(e) => {
                    log::warn!("Enrichment failed for row {}: {}", idx + 1, e);
                    fallback_record(row)
                }
            }
        } else {
            fallback_record(row)
        };

        records.push(record);
        progress(idx + 1, total);
    }

    records
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Build a record from the service response. A non-empty sheet
/// classification wins over the suggested one.
pub fn record_from_response(row: &DraftRow, fields: EnrichedFields) -> RequirementRecord {
    let classification = match non_empty(&row.classification) {
        Some(original) => original.to_string(),
        None if !fields.classification.trim().is_empty() => fields.classification,
        None => DEFAULT_CLASSIFICATION.to_string(),
    };

    RequirementRecord {
        id: Uuid::new_v4(),
        title_en: fields.title_en,
        title_ar: fields.title_ar,
        description_en: fields.description_en,
        description_ar: fields.description_ar,
        classification,
        priority: fields.priority,
        additional_data: row.additional_data.clone(),
    }
}

/// Build a record purely from the sheet values
pub fn fallback_record(row: &DraftRow) -> RequirementRecord {
    let title_en = non_empty(&row.title_en).or(non_empty(&row.title_ar));
    let title_ar = non_empty(&row.title_ar).or(non_empty(&row.title_en));
    let description_en = non_empty(&row.description_en).or(non_empty(&row.description_ar));
    let description_ar = non_empty(&row.description_ar).or(non_empty(&row.description_en));

    RequirementRecord {
        id: Uuid::new_v4(),
        title_en: title_en.unwrap_or(UNTITLED_EN).to_string(),
        title_ar: title_ar.unwrap_or(UNTITLED_AR).to_string(),
        description_en: description_en.unwrap_or_default().to_string(),
        description_ar: description_ar.unwrap_or_default().to_string(),
        classification: non_empty(&row.classification)
            .unwrap_or(DEFAULT_CLASSIFICATION)
            .to_string(),
        priority: row
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default(),
        additional_data: row.additional_data.clone(),
    }
}
