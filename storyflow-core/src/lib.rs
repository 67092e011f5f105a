pub mod ai;
pub mod config;
pub mod db;
pub mod import;
pub mod lang;
pub mod models;
pub mod parser;
pub mod sheet;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use ai::{AiClient, AiError, AiMode, EnrichedFields, EnrichmentService};
pub use config::Settings;
pub use db::{create_backend, BackendType, FileBackend, MemoryBackend, SnapshotBackend};
pub use import::{import_file, import_file_with_progress, ImportError, ImportSummary};
pub use lang::Language;
pub use models::{
    AdditionalData, AdditionalField, DraftRow, Priority, RequirementRecord,
    DEFAULT_CLASSIFICATION, UNTITLED_AR, UNTITLED_EN,
};
pub use parser::{Layout, ParsedSheet};
pub use store::RecordStore;
pub use view::{Card, CardSection, Inventory, LanguageMode, SectionBody, ViewFilter};
