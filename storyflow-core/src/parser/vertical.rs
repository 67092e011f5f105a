use crate::lang::Language;
use crate::models::DraftRow;
use crate::sheet::{cell, Grid};

use super::assign;
use super::routing::{route_vertical, CoreField, FieldTarget};

/// Normalize a vertical sheet into its single draft row.
///
/// Column 0 holds the label, column 1 the English value and column 2 the
/// Arabic value.
pub fn normalize_vertical(grid: &Grid) -> DraftRow {
    let mut row = DraftRow::default();

    for record in grid {
        let label = cell(record, 0).trim();
        if label.is_empty() {
            continue;
        }
        let val_en = cell(record, 1).trim();
        let val_ar = cell(record, 2).trim();
        let either = if val_en.is_empty() { val_ar } else { val_en };

        match route_vertical(label) {
            FieldTarget::Core(CoreField::Title) => {
                assign(&mut row.title_en, val_en);
                assign(&mut row.title_ar, val_ar);
            }
            FieldTarget::Core(CoreField::Description) => {
                assign(&mut row.description_en, val_en);
                assign(&mut row.description_ar, val_ar);
            }
            FieldTarget::Core(CoreField::Classification) => {
                assign(&mut row.classification, either);
            }
            FieldTarget::Core(CoreField::Priority) => {
                assign(&mut row.priority, either);
            }
            FieldTarget::Additional => {
                log::debug!("Vertical label {:?} kept as additional data", label);
                let extra = &mut row.additional_data;
                if !val_en.is_empty() {
                    extra.push(label, Some(Language::En), val_en);
                }
                if !val_ar.is_empty() {
                    extra.push(label, Some(Language::Ar), val_ar);
                }
                // A single-language value is also kept under the bare label
                if val_en.is_empty() != val_ar.is_empty() {
                    extra.push(label, None, either);
                }
            }
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_title_and_story() {
        let g = grid(&[
            &["Title", "Hello", "مرحبا"],
            &["User Story", "As a user...", "كمستخدم..."],
        ]);
        let row = normalize_vertical(&g);

        assert_eq!(row.title_en.as_deref(), Some("Hello"));
        assert_eq!(row.title_ar.as_deref(), Some("مرحبا"));
        assert_eq!(row.description_en.as_deref(), Some("As a user..."));
        assert_eq!(row.description_ar.as_deref(), Some("كمستخدم..."));
        assert!(row.additional_data.is_empty());
    }

    #[test]
    fn test_later_empty_value_does_not_overwrite() {
        let g = grid(&[
            &["Title", "First", "الأول"],
            &["Title", "", "الثاني"],
            &["Title", "Third"],
        ]);
        let row = normalize_vertical(&g);

        assert_eq!(row.title_en.as_deref(), Some("Third"));
        assert_eq!(row.title_ar.as_deref(), Some("الثاني"));
    }

    #[test]
    fn test_classification_and_priority_fall_back_to_arabic() {
        let g = grid(&[
            &["Classification", "", "أمان"],
            &["Priority", "High", "عالية"],
        ]);
        let row = normalize_vertical(&g);

        assert_eq!(row.classification.as_deref(), Some("أمان"));
        assert_eq!(row.priority.as_deref(), Some("High"));
    }

    #[test]
    fn test_additional_data_both_languages() {
        let g = grid(&[&["Acceptance Criteria", "- works", "- يعمل"]]);
        let row = normalize_vertical(&g);

        assert_eq!(
            row.additional_data.keys(),
            vec!["Acceptance Criteria (EN)", "Acceptance Criteria (AR)"]
        );
        assert_eq!(row.additional_data.get("Acceptance Criteria (EN)"), Some("- works"));
        assert_eq!(row.additional_data.get("Acceptance Criteria (AR)"), Some("- يعمل"));
        assert_eq!(row.additional_data.get("Acceptance Criteria"), None);
    }

    #[test]
    fn test_additional_data_single_language_adds_bare_key() {
        let g = grid(&[&["Scenario", "", "سيناريو"], &["Owner", "Dana"]]);
        let row = normalize_vertical(&g);

        assert_eq!(
            row.additional_data.keys(),
            vec!["Scenario (AR)", "Scenario", "Owner (EN)", "Owner"]
        );
        assert_eq!(row.additional_data.get("Scenario"), Some("سيناريو"));
        assert_eq!(row.additional_data.get("Owner"), Some("Dana"));
    }

    #[test]
    fn test_blank_labels_and_values_are_skipped() {
        let g = grid(&[&["", "orphan", "يتيم"], &["  ", "x"], &["Notes", "", ""]]);
        let row = normalize_vertical(&g);

        assert_eq!(row, DraftRow::default());
    }
}
