//! Data models for docingest.

mod extracted;
mod file_record;

pub use extracted::{
    DocumentMetadata, Entity, EntityType, ExtractedDocument, ExtractionSource, Section,
    Statistics, SUMMARY_CHARS,
};
pub use file_record::{FileRecord, FileSummary, Fingerprint, NewFileRecord, ProcessResult};
