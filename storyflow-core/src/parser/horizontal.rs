use crate::lang::Language;
use crate::models::DraftRow;
use crate::sheet::{cell, Grid};

use super::assign;
use super::routing::{horizontal_language, route_horizontal, CoreField, FieldTarget};

/// Normalize a horizontal sheet: row 0 is the header, every non-blank row
/// after it becomes one draft row
pub fn normalize_horizontal(grid: &Grid) -> Vec<DraftRow> {
    let Some((header, data)) = grid.split_first() else {
        return Vec::new();
    };

    data.iter()
        .filter(|record| record.iter().any(|c| !c.trim().is_empty()))
        .map(|record| normalize_record(header, record))
        .collect()
}

fn normalize_record(header: &[String], record: &[String]) -> DraftRow {
    let mut row = DraftRow::default();

    for (idx, column) in header.iter().enumerate() {
        if column.trim().is_empty() {
            continue;
        }
        let value = cell(record, idx).trim();

        match route_horizontal(column) {
            FieldTarget::Core(CoreField::Title) => match horizontal_language(column, value) {
                Language::En => assign(&mut row.title_en, value),
                Language::Ar => assign(&mut row.title_ar, value),
            },
            FieldTarget::Core(CoreField::Description) => {
                match horizontal_language(column, value) {
                    Language::En => assign(&mut row.description_en, value),
                    Language::Ar => assign(&mut row.description_ar, value),
                }
            }
            FieldTarget::Core(CoreField::Classification) => {
                assign(&mut row.classification, value);
            }
            FieldTarget::Core(CoreField::Priority) => {
                assign(&mut row.priority, value);
            }
            // Language is sniffed later by the viewer
            FieldTarget::Additional => row.additional_data.push(column.as_str(), None, value),
        }
    }

    row
}
