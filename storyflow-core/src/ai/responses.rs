//! Response Parsing Module
//!
//! Parses JSON responses from the enrichment service into structured data.

use crate::ai::client::AiError;
use crate::models::Priority;
use serde::{Deserialize, Deserializer, Serialize};

/// Fields returned by the enrichment service for one requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFields {
    pub title_en: String,
    pub title_ar: String,
    pub description_en: String,
    pub description_ar: String,
    pub classification: String,
    #[serde(deserialize_with = "deserialize_priority")]
    pub priority: Priority,
}

fn deserialize_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Priority::parse(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "priority must be High, Medium or Low, got {:?}",
            raw
        ))
    })
}

/// `generateContent` response envelope (only the parts we read)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Extract JSON from a response that may contain markdown code blocks
fn extract_json(response: &str) -> &str {
    // Look for JSON in markdown code block
    if let Some(start) = response.find("```json") {
        let json_start = start + 7; // Skip "```json"
        if let Some(end) = response[json_start..].find("```") {
            return response[json_start..json_start + end].trim();
        }
    }

    // Look for generic code block
    if let Some(start) = response.find("```") {
        let code_start = start + 3;
        // Skip language identifier if present
        let json_start = if let Some(newline) = response[code_start..].find('\n') {
            code_start + newline + 1
        } else {
            code_start
        };
        if let Some(end) = response[json_start..].find("```") {
            return response[json_start..json_start + end].trim();
        }
    }

    // Try to find JSON object directly
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return &response[start..=end];
            }
        }
    }

    response.trim()
}

/// Cut a string to at most `max` bytes without splitting a character
fn preview(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Parse the enrichment fields from the model's text output
pub fn parse_enrichment_response(response: &str) -> Result<EnrichedFields, AiError> {
    let json_str = extract_json(response);
    serde_json::from_str(json_str).map_err(|e| {
        AiError::InvalidResponse(format!(
            "Failed to parse enrichment response: {}. JSON: {}",
            e,
            preview(json_str, 200)
        ))
    })
}

/// Pull the generated text out of a `generateContent` response body
pub fn extract_gemini_text(body: &str) -> Result<String, AiError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        AiError::InvalidResponse(format!("Malformed generateContent response: {}", e))
    })?;

    if let Some(reason) = envelope
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(AiError::InvalidResponse(format!("Prompt blocked: {}", reason)));
    }

    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::InvalidResponse(
            "No candidate text in response".to_string(),
        ));
    }

    Ok(text)
}
