//! File ingestion pipeline.
//!
//! Hash, deduplicate, detect, extract, analyze, persist. Each distinct piece
//! of content is processed once; later uploads of the same bytes return the
//! stored result untouched.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::analysis::{extract_sections, EntityExtractor, RegexEntityExtractor};
use crate::extract::{Extraction, TextExtractor};
use crate::models::{
    ExtractedDocument, FileRecord, FileSummary, Fingerprint, NewFileRecord, ProcessResult,
};
use crate::repository::{FileStore, StoreError};
use crate::utils::TypeDetector;

/// Errors from the ingestion pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Empty file uploaded")]
    EmptyInput,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stored record with its extraction payload decoded.
#[derive(Debug, Clone, Serialize)]
pub struct FileDetail {
    pub filename: String,
    pub file_type: String,
    pub created_at: String,
    pub data: serde_json::Value,
}

impl FileDetail {
    fn from_record(record: &FileRecord) -> Result<Self, serde_json::Error> {
        Ok(Self {
            filename: record.filename.clone(),
            file_type: record.detected_type.clone(),
            created_at: record.created_at.to_rfc3339(),
            data: record.extracted_value()?,
        })
    }
}

/// Orchestrates processing of uploaded files.
#[derive(Clone)]
pub struct FileProcessor {
    store: Arc<dyn FileStore>,
    extractor: Arc<TextExtractor>,
    entities: Arc<dyn EntityExtractor>,
    detector: TypeDetector,
}

impl FileProcessor {
    /// Create a processor over a store and text extractor, using the default
    /// type detector and regex entity extractor.
    pub fn new(store: Arc<dyn FileStore>, extractor: Arc<TextExtractor>) -> Self {
        Self {
            store,
            extractor,
            entities: Arc::new(RegexEntityExtractor::new()),
            detector: TypeDetector::default(),
        }
    }

    /// Replace the type detector.
    pub fn with_detector(mut self, detector: TypeDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the entity extractor.
    pub fn with_entity_extractor(mut self, entities: Arc<dyn EntityExtractor>) -> Self {
        self.entities = entities;
        self
    }

    /// Process one uploaded file.
    pub async fn process(
        &self,
        content: Vec<u8>,
        filename: &str,
    ) -> Result<ProcessResult, PipelineError> {
        if content.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let fingerprint = Fingerprint::compute(&content);
        if let Some(existing) = self.store.find_by_fingerprint(&fingerprint).await? {
            info!(
                "{} already stored as record {} ({})",
                filename, existing.id, fingerprint
            );
            return Ok(ProcessResult::from_existing(&existing)?);
        }

        let file_type = self.detector.detect(&content, filename);
        debug!("Detected {} as {}", filename, file_type);

        let content: Arc<[u8]> = content.into();
        let document = self.analyze(content.clone(), &file_type, filename).await;
        let extracted_json = serde_json::to_string(&document)?;

        let record = NewFileRecord {
            filename: filename.to_string(),
            fingerprint: fingerprint.clone(),
            raw_content: content.to_vec(),
            extracted_json,
            detected_type: file_type.clone(),
        };

        match self.store.insert(record).await {
            Ok(stored) => {
                info!(
                    "Processed {} as record {} ({}, {} entities, {} sections)",
                    filename,
                    stored.id,
                    file_type,
                    document.statistics.total_entities,
                    document.statistics.total_sections
                );
                Ok(ProcessResult::Processed {
                    message: ProcessResult::PROCESSED_MESSAGE.to_string(),
                    data: document,
                    filename: filename.to_string(),
                    file_type,
                    file_hash: fingerprint.to_string(),
                })
            }
            Err(StoreError::DuplicateFingerprint(_)) => {
                warn!(
                    "Another upload stored {} first, returning its record",
                    fingerprint
                );
                match self.store.find_by_fingerprint(&fingerprint).await? {
                    Some(winner) => Ok(ProcessResult::from_existing(&winner)?),
                    None => Err(StoreError::DuplicateFingerprint(fingerprint).into()),
                }
            }
            Err(e) => {
                error!("Failed to store {}: {}", filename, e);
                Err(e.into())
            }
        }
    }

    /// All stored files, newest first.
    pub async fn list(&self) -> Result<Vec<FileSummary>, PipelineError> {
        Ok(self.store.list_all().await?)
    }

    /// A stored record by ID.
    pub async fn get(&self, id: i64) -> Result<Option<FileRecord>, PipelineError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// A stored record by ID with its payload decoded.
    pub async fn detail(&self, id: i64) -> Result<Option<FileDetail>, PipelineError> {
        match self.get(id).await? {
            Some(record) => Ok(Some(FileDetail::from_record(&record)?)),
            None => Ok(None),
        }
    }

    /// Extract and analyze on the blocking pool.
    async fn analyze(&self, content: Arc<[u8]>, file_type: &str, filename: &str) -> ExtractedDocument {
        let extractor = self.extractor.clone();
        let entities = self.entities.clone();
        let task_content = content.clone();
        let task_type = file_type.to_string();
        let task_name = filename.to_string();

        let task = tokio::task::spawn_blocking(move || {
            let extraction = extractor.extract(&task_content, &task_type, &task_name);
            build_document(extraction, &task_type, entities.as_ref())
        });

        match task.await {
            Ok(document) => document,
            Err(e) => {
                warn!("Extraction task for {} failed: {}", filename, e);
                let extraction =
                    Extraction::fallback(&content, format!("extraction task failed: {}", e));
                build_document(extraction, file_type, self.entities.as_ref())
            }
        }
    }
}

/// Run entity and section extraction over extracted text and assemble the result.
fn build_document(
    extraction: Extraction,
    file_type: &str,
    entities: &dyn EntityExtractor,
) -> ExtractedDocument {
    let Extraction {
        text,
        method,
        backend_payload,
        error,
    } = extraction;

    let found = entities.extract(&text);
    let sections = extract_sections(&text);

    ExtractedDocument::new(
        text,
        file_type,
        method.source(),
        method.label(),
        error,
        found,
        sections,
        backend_payload,
    )
}
