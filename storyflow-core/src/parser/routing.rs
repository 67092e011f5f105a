//! Field routing tables
//!
//! Each layout maps a lower-cased label to a target field through an ordered
//! table of keyword groups. The first group with a matching keyword wins, so
//! title keywords take precedence over description keywords and so on.

use crate::lang::contains_arabic;
use crate::lang::Language;

/// Core fields a label can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreField {
    Title,
    Description,
    Classification,
    Priority,
}

/// Where a sheet label's values go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Core(CoreField),
    Additional,
}

/// A keyword group: the label matches if it contains any keyword
struct Route {
    field: CoreField,
    keywords: &'static [&'static str],
}

const VERTICAL_ROUTES: &[Route] = &[
    Route {
        field: CoreField::Title,
        keywords: &["title", "عنوان", "الموضوع", "اسم"],
    },
    Route {
        field: CoreField::Description,
        keywords: &["story", "description", "قصة", "وصف", "متطلب"],
    },
    Route {
        field: CoreField::Classification,
        keywords: &["class", "تصنيف", "نوع"],
    },
    Route {
        field: CoreField::Priority,
        keywords: &["priority", "أولوية"],
    },
];

const HORIZONTAL_ROUTES: &[Route] = &[
    Route {
        field: CoreField::Title,
        keywords: &["title", "عنوان"],
    },
    Route {
        field: CoreField::Description,
        keywords: &["desc", "story", "وصف", "قصة"],
    },
    Route {
        field: CoreField::Classification,
        keywords: &["class", "تصنيف"],
    },
    Route {
        field: CoreField::Priority,
        keywords: &["priority", "أولوية"],
    },
];

/// Header word-tokens that mark an Arabic-language column
const ARABIC_MARKERS: &[&str] = &["ar", "arabic", "عربي", "العربية"];

fn route(table: &[Route], label: &str) -> FieldTarget {
    let label = label.trim().to_lowercase();
    table
        .iter()
        .find(|r| r.keywords.iter().any(|k| label.contains(k)))
        .map(|r| FieldTarget::Core(r.field))
        .unwrap_or(FieldTarget::Additional)
}

/// Route a row label from a vertical sheet
pub fn route_vertical(label: &str) -> FieldTarget {
    route(VERTICAL_ROUTES, label)
}

/// Route a column header from a horizontal sheet
pub fn route_horizontal(header: &str) -> FieldTarget {
    route(HORIZONTAL_ROUTES, header)
}

/// True if the header contains a word marking it as the Arabic column,
/// e.g. "Title (AR)" or "Description_Arabic"
pub fn has_arabic_marker(header: &str) -> bool {
    header
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| ARABIC_MARKERS.contains(&token))
}

/// Language side for a horizontal title/description cell: the header marker
/// wins, otherwise the cell content is sniffed
pub fn horizontal_language(header: &str, value: &str) -> Language {
    if has_arabic_marker(header) || contains_arabic(value) {
        Language::Ar
    } else {
        Language::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_routes() {
        assert_eq!(route_vertical("Title"), FieldTarget::Core(CoreField::Title));
        assert_eq!(route_vertical("اسم المتطلب"), FieldTarget::Core(CoreField::Title));
        assert_eq!(
            route_vertical("User Story"),
            FieldTarget::Core(CoreField::Description)
        );
        assert_eq!(
            route_vertical("وصف"),
            FieldTarget::Core(CoreField::Description)
        );
        assert_eq!(
            route_vertical("Classification"),
            FieldTarget::Core(CoreField::Classification)
        );
        assert_eq!(
            route_vertical("Priority Level"),
            FieldTarget::Core(CoreField::Priority)
        );
        assert_eq!(route_vertical("Acceptance Criteria"), FieldTarget::Additional);
    }

    #[test]
    fn test_title_takes_precedence() {
        // Contains both a title keyword and a description keyword
        assert_eq!(
            route_vertical("Story Title"),
            FieldTarget::Core(CoreField::Title)
        );
        assert_eq!(
            route_horizontal("Description Title"),
            FieldTarget::Core(CoreField::Title)
        );
    }

    #[test]
    fn test_horizontal_routes() {
        assert_eq!(route_horizontal(" TITLE "), FieldTarget::Core(CoreField::Title));
        assert_eq!(
            route_horizontal("Desc (AR)"),
            FieldTarget::Core(CoreField::Description)
        );
        assert_eq!(
            route_horizontal("Sub-class"),
            FieldTarget::Core(CoreField::Classification)
        );
        assert_eq!(
            route_horizontal("priority"),
            FieldTarget::Core(CoreField::Priority)
        );
        assert_eq!(route_horizontal("Owner"), FieldTarget::Additional);
        // Vertical-only keyword
        assert_eq!(route_horizontal("نوع"), FieldTarget::Additional);
    }

    #[test]
    fn test_arabic_marker_is_a_whole_token() {
        assert!(has_arabic_marker("Title (AR)"));
        assert!(has_arabic_marker("title_ar"));
        assert!(has_arabic_marker("Description Arabic"));
        assert!(has_arabic_marker("العنوان عربي"));
        assert!(!has_arabic_marker("Story Summary"));
        assert!(!has_arabic_marker("Title"));
    }

    #[test]
    fn test_horizontal_language() {
        assert_eq!(horizontal_language("Title", "Fix bug"), Language::En);
        assert_eq!(horizontal_language("Title", "إصلاح"), Language::Ar);
        assert_eq!(horizontal_language("Title AR", "Fix bug"), Language::Ar);
    }
}
