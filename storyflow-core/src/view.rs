//! Viewer model
//!
//! Filtering of the record list and the per-language card layout. The CLI
//! only renders what this module produces.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::lang::Language;
use crate::models::{AdditionalField, RequirementRecord};

/// Which language cards to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageMode {
    English,
    Arabic,
    #[default]
    Both,
}

impl LanguageMode {
    /// Languages shown in this mode, English first
    pub fn languages(&self) -> &'static [Language] {
        match self {
            LanguageMode::English => &[Language::En],
            LanguageMode::Arabic => &[Language::Ar],
            LanguageMode::Both => &[Language::En, Language::Ar],
        }
    }
}

impl FromStr for LanguageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(LanguageMode::English),
            "ar" | "arabic" => Ok(LanguageMode::Arabic),
            "both" => Ok(LanguageMode::Both),
            _ => Err(format!(
                "Invalid language mode: {}. Must be en, ar or both",
                s
            )),
        }
    }
}

impl fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageMode::English => write!(f, "en"),
            LanguageMode::Arabic => write!(f, "ar"),
            LanguageMode::Both => write!(f, "both"),
        }
    }
}

/// Search text plus an optional classification
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub search: String,
    /// `None` shows every classification
    pub classification: Option<String>,
}

impl ViewFilter {
    pub fn new(search: impl Into<String>, classification: Option<String>) -> Self {
        Self {
            search: search.into(),
            classification,
        }
    }

    /// English text and additional values match case-insensitively, Arabic
    /// text verbatim
    pub fn matches(&self, record: &RequirementRecord) -> bool {
        if let Some(class) = &self.classification {
            if &record.classification != class {
                return false;
            }
        }

        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        record.title_en.to_lowercase().contains(&needle)
            || record.title_ar.contains(&self.search)
            || record.description_en.to_lowercase().contains(&needle)
            || record.description_ar.contains(&self.search)
            || record
                .additional_data
                .iter()
                .any(|f| f.value.to_lowercase().contains(&needle))
    }
}

/// Records passing the filter, in list order
pub fn filter_records<'a>(
    records: &'a [RequirementRecord],
    filter: &ViewFilter,
) -> Vec<&'a RequirementRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Distinct non-empty classifications in first-seen order
pub fn classifications(records: &[RequirementRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        if !record.classification.is_empty() && !seen.contains(&record.classification) {
            seen.push(record.classification.clone());
        }
    }
    seen
}

/// Every record as one table row, with a column per distinct additional
/// field key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Additional field keys in first-seen order
    pub columns: Vec<String>,
    /// One row per record, aligned with `columns`; `-` where a record has no
    /// value for the key
    pub rows: Vec<Vec<String>>,
}

pub fn build_inventory(records: &[RequirementRecord]) -> Inventory {
    let mut columns: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|r| r.additional_data.keys()) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|key| match record.additional_data.get(key) {
                    Some(value) if !value.trim().is_empty() => value.to_string(),
                    _ => "-".to_string(),
                })
                .collect()
        })
        .collect();

    Inventory { columns, rows }
}

/// Body of a card section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSection {
    pub label: String,
    pub body: SectionBody,
}

/// One record as seen in one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub lang: Language,
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub sections: Vec<CardSection>,
}

impl Card {
    /// Heading shown above the description
    pub fn description_heading(&self) -> &'static str {
        match self.lang {
            Language::En => "User Story",
            Language::Ar => "وصف المتطلبات",
        }
    }
}

/// Build the cards for a record, one per language the mode shows
pub fn build_cards(record: &RequirementRecord, mode: LanguageMode) -> Vec<Card> {
    mode.languages()
        .iter()
        .map(|&lang| build_card(record, lang))
        .collect()
}

fn build_card(record: &RequirementRecord, lang: Language) -> Card {
    let sections = record
        .additional_data
        .iter()
        .filter(|field| field.language() == lang && is_shown(field))
        .filter(|field| !duplicates_tagged(record, field))
        .map(|field| CardSection {
            label: display_label(&field.label, lang),
            body: format_value(&field.value),
        })
        .collect();

    Card {
        lang,
        id: record.id,
        title: record.title(lang).to_string(),
        description: record.description(lang).to_string(),
        sections,
    }
}

/// An untagged entry that repeats a tagged one with the same label and value
fn duplicates_tagged(record: &RequirementRecord, field: &AdditionalField) -> bool {
    field.lang.is_none()
        && record
            .additional_data
            .iter()
            .any(|other| {
                other.lang.is_some() && other.label == field.label && other.value == field.value
            })
}

/// False for entries already shown as title/description and for
/// placeholder values
fn is_shown(field: &AdditionalField) -> bool {
    let label = field.label.trim().to_lowercase();
    if label.contains("title")
        || label.contains("desc")
        || label.contains("story")
        || label == "us"
        || label == "id"
    {
        return false;
    }

    let value = field.value.trim();
    !(value.is_empty() || value == "N/A" || value == "-")
}

/// Canonical section label for a sheet label. Any trailing "(EN)" / "(AR)"
/// tag is dropped; unknown labels are returned as they are.
pub fn display_label(label: &str, lang: Language) -> String {
    let label = strip_language_tag(label);
    let k = label.to_lowercase();

    let mapped = match lang {
        Language::Ar => {
            if k.contains("title") || k.contains("عنوان") {
                Some("العنوان")
            } else if k.contains("user story") || k.contains("قصة") {
                Some("قصة المستخدم")
            } else if k.contains("acceptance criteria") || k.contains("قبول") {
                Some("معايير القبول")
            } else if k.contains("system messages") || k.contains("نظام") {
                Some("رسائل النظام")
            } else if k.contains("fields specification") || k.contains("مواصفات") {
                Some("مواصفات الحقول")
            } else if k.contains("scenario") || k.contains("سيناريو") {
                Some("السيناريو")
            } else if k.contains("classification") || k.contains("تصنيف") {
                Some("التصنيف")
            } else {
                None
            }
        }
        Language::En => {
            if k.contains("title") {
                Some("Title")
            } else if k.contains("user story") {
                Some("User Story")
            } else if k.contains("acceptance criteria") {
                Some("Acceptance Criteria")
            } else if k.contains("system messages") {
                Some("System Messages")
            } else if k.contains("fields specification") {
                Some("Fields Specification")
            } else if k.contains("scenario") {
                Some("Scenario")
            } else if k.contains("classification") {
                Some("Classification")
            } else {
                None
            }
        }
    };

    mapped.map(str::to_string).unwrap_or_else(|| label.to_string())
}

fn strip_language_tag(label: &str) -> &str {
    let trimmed = label.trim();
    let lower = trimmed.to_lowercase();
    if lower.ends_with("(en)") || lower.ends_with("(ar)") {
        // The tag is ASCII, so byte offsets line up
        trimmed[..trimmed.len() - 4].trim_end()
    } else {
        trimmed
    }
}

/// Multi-line values, or values with " - " separators, become bullet
/// lines; anything else stays a paragraph
pub fn format_value(value: &str) -> SectionBody {
    if !(value.contains('\n') || value.contains(" - ")) {
        return SectionBody::Text(value.to_string());
    }

    let lines = value
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('-').unwrap_or(line).trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect();

    SectionBody::Bullets(lines)
}
