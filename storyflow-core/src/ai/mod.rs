//! AI Integration Module for StoryFlow
//!
//! This module fills in missing translations, classification and priority
//! for imported requirements using an external text-generation service.

pub mod client;
pub mod enricher;
pub mod prompts;
pub mod responses;

pub use client::{AiClient, AiError, AiMode, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use enricher::{
    enrich_rows, enrich_rows_with_progress, fallback_record, record_from_response,
    EnrichmentService,
};
pub use responses::EnrichedFields;
