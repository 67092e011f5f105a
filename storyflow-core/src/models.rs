use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::lang::{contains_arabic, Language};

/// Placeholder for a record with no English title
pub const UNTITLED_EN: &str = "Untitled";

/// Placeholder for a record with no Arabic title
pub const UNTITLED_AR: &str = "بدون عنوان";

/// Classification used when neither the sheet nor the AI provides one
pub const DEFAULT_CLASSIFICATION: &str = "Uncategorized";

/// Represents the priority of a requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl Priority {
    /// Parse a priority from free spreadsheet text, ignoring case and padding
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// A column or row from the sheet that did not map to a core field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdditionalField {
    /// Label as it appeared in the sheet
    pub label: String,

    /// Explicit language tag, if the sheet layout provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<Language>,

    pub value: String,
}

impl AdditionalField {
    pub fn new(label: impl Into<String>, lang: Option<Language>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            lang,
            value: value.into(),
        }
    }

    /// Display key: "<label> (EN)", "<label> (AR)" or the bare label
    pub fn key(&self) -> String {
        match self.lang {
            Some(lang) => format!("{} ({})", self.label, lang.suffix()),
            None => self.label.clone(),
        }
    }

    /// Language this entry belongs to: the explicit tag, or sniffed from
    /// the label and value
    pub fn language(&self) -> Language {
        match self.lang {
            Some(lang) => lang,
            None if contains_arabic(&self.label) || contains_arabic(&self.value) => Language::Ar,
            None => Language::En,
        }
    }
}

/// Ordered bag of fields that did not map to a core field
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AdditionalData(Vec<AdditionalField>);

impl AdditionalData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        label: impl Into<String>,
        lang: Option<Language>,
        value: impl Into<String>,
    ) {
        self.0.push(AdditionalField::new(label, lang, value));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AdditionalField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First value stored under the given display key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|f| f.key() == key)
            .map(|f| f.value.as_str())
    }

    /// All display keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.0.iter().map(AdditionalField::key).collect()
    }
}

impl<'a> IntoIterator for &'a AdditionalData {
    type Item = &'a AdditionalField;
    type IntoIter = std::slice::Iter<'a, AdditionalField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<AdditionalField> for AdditionalData {
    fn from_iter<I: IntoIterator<Item = AdditionalField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A requirement's fields as extracted from a sheet, before enrichment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRow {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub classification: Option<String>,
    /// Raw priority text; not validated until enrichment
    pub priority: Option<String>,
    pub additional_data: AdditionalData,
}

impl DraftRow {
    /// True when a title or description in either language has more than
    /// one character
    pub fn has_meaningful_content(&self) -> bool {
        [
            &self.title_en,
            &self.title_ar,
            &self.description_en,
            &self.description_ar,
        ]
        .iter()
        .any(|field| field.as_deref().is_some_and(|s| s.chars().count() > 1))
    }
}

/// The enriched, canonical requirement kept in the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequirementRecord {
    /// Unique identifier, assigned at enrichment time
    pub id: Uuid,

    pub title_en: String,
    pub title_ar: String,
    pub description_en: String,
    pub description_ar: String,

    /// Free-form category label
    pub classification: String,

    pub priority: Priority,

    /// Extra sheet columns, in sheet order
    #[serde(default, skip_serializing_if = "AdditionalData::is_empty")]
    pub additional_data: AdditionalData,
}

impl RequirementRecord {
    /// Title for the given language
    pub fn title(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.title_en,
            Language::Ar => &self.title_ar,
        }
    }

    /// Description for the given language
    pub fn description(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.description_en,
            Language::Ar => &self.description_ar,
        }
    }
}
