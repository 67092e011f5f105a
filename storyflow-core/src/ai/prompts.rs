//! Prompt Templates for Enrichment
//!
//! Builds the translation/enrichment prompt for a draft row and the request
//! body for the Gemini `generateContent` endpoint.

use serde_json::{json, Value};

use crate::models::{DraftRow, DEFAULT_CLASSIFICATION};

/// Shown in the prompt for fields the sheet left empty
const MISSING: &str = "N/A";

/// Fields every enrichment response must contain
pub const REQUIRED_FIELDS: &[&str] = &[
    "titleEn",
    "titleAr",
    "descriptionEn",
    "descriptionAr",
    "classification",
    "priority",
];

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(MISSING)
}

/// Build the prompt asking the model to translate and complete a requirement
pub fn build_enrichment_prompt(row: &DraftRow) -> String {
    format!(
        r#"You are a professional product owner maintaining bilingual (English/Arabic) requirements.
Translate and complete the user story below. Fill in any missing language from the
other one, keep the meaning intact, and suggest a short classification and a priority.

## Input Story
- Title (EN): {}
- Title (AR): {}
- Description (EN): {}
- Description (AR): {}
- Current Classification: {}

## Response Format
Respond with only a JSON object:
{{
  "titleEn": "...",
  "titleAr": "...",
  "descriptionEn": "...",
  "descriptionAr": "...",
  "classification": "...",
  "priority": "High" | "Medium" | "Low"
}}"#,
        or_missing(&row.title_en),
        or_missing(&row.title_ar),
        or_missing(&row.description_en),
        or_missing(&row.description_ar),
        row.classification
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CLASSIFICATION),
    )
}

/// JSON schema the Gemini API enforces on the response
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "titleEn": { "type": "STRING" },
            "titleAr": { "type": "STRING" },
            "descriptionEn": { "type": "STRING" },
            "descriptionAr": { "type": "STRING" },
            "classification": { "type": "STRING" },
            "priority": { "type": "STRING", "enum": ["High", "Medium", "Low"] }
        },
        "required": REQUIRED_FIELDS
    })
}

/// Request body for `models/{model}:generateContent`
pub fn gemini_request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_fields() {
        let row = DraftRow {
            title_en: Some("Login".to_string()),
            description_ar: Some("تسجيل الدخول".to_string()),
            classification: Some("Security".to_string()),
            ..Default::default()
        };

        let prompt = build_enrichment_prompt(&row);
        assert!(prompt.contains("- Title (EN): Login"));
        assert!(prompt.contains("- Title (AR): N/A"));
        assert!(prompt.contains("- Description (AR): تسجيل الدخول"));
        assert!(prompt.contains("- Current Classification: Security"));
    }

    #[test]
    fn test_prompt_defaults_classification() {
        let prompt = build_enrichment_prompt(&DraftRow::default());
        assert!(prompt.contains("- Current Classification: Uncategorized"));
        assert!(prompt.contains("- Description (EN): N/A"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = gemini_request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let required = body["generationConfig"]["responseSchema"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 6);
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["priority"]["enum"][0],
            "High"
        );
    }
}
