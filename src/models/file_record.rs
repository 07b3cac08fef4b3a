//! Stored file records and the results handed back to uploaders.
//!
//! Records are content-addressed: the SHA-256 fingerprint of the uploaded
//! bytes is the only deduplication key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ExtractedDocument;

/// Hex-encoded SHA-256 digest of a file's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of raw content.
    pub fn compute(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap a digest read back from storage.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted upload.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Database row ID.
    pub id: i64,
    /// Filename as supplied by the uploader (not unique).
    pub filename: String,
    /// Content fingerprint (unique across all records).
    pub fingerprint: Fingerprint,
    /// Raw uploaded bytes.
    pub raw_content: Vec<u8>,
    /// Serialized [`ExtractedDocument`].
    pub extracted_json: String,
    /// Canonical type tag ("pdf", "docx", "txt", ...).
    pub detected_type: String,
    /// When the record was first written.
    pub created_at: DateTime<Utc>,
    /// Last explicit re-save, if any.
    pub updated_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// Parse the stored extraction payload.
    pub fn extracted_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.extracted_json)
    }

    /// Metadata-only view used by listings.
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id,
            filename: self.filename.clone(),
            file_type: self.detected_type.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A record that has not been written yet.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub filename: String,
    pub fingerprint: Fingerprint,
    pub raw_content: Vec<u8>,
    pub extracted_json: String,
    pub detected_type: String,
}

/// Listing row without content or extraction payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: i64,
    pub filename: String,
    pub file_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outcome of processing one upload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessResult {
    /// First time this content was seen; extraction ran and a record was written.
    Processed {
        message: String,
        data: ExtractedDocument,
        filename: String,
        file_type: String,
        file_hash: String,
    },
    /// Content already stored; the stored payload is returned untouched.
    AlreadyAvailable {
        message: String,
        data: serde_json::Value,
        filename: String,
        file_type: String,
        file_hash: String,
        created_at: String,
    },
}

impl ProcessResult {
    pub const PROCESSED_MESSAGE: &'static str = "File processed successfully";
    pub const CACHED_MESSAGE: &'static str = "File already available in database";

    /// Build a cache-hit result from a stored record.
    pub fn from_existing(record: &FileRecord) -> Result<Self, serde_json::Error> {
        Ok(Self::AlreadyAvailable {
            message: Self::CACHED_MESSAGE.to_string(),
            data: record.extracted_value()?,
            filename: record.filename.clone(),
            file_type: record.detected_type.clone(),
            file_hash: record.fingerprint.to_string(),
            created_at: record.created_at.to_rfc3339(),
        })
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Processed { .. } => "processed",
            Self::AlreadyAvailable { .. } => "already_available",
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::Processed { filename, .. } | Self::AlreadyAvailable { filename, .. } => filename,
        }
    }

    pub fn file_hash(&self) -> &str {
        match self {
            Self::Processed { file_hash, .. } | Self::AlreadyAvailable { file_hash, .. } => {
                file_hash
            }
        }
    }

    /// The extraction payload as JSON, regardless of outcome.
    pub fn data_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Processed { data, .. } => serde_json::to_value(data),
            Self::AlreadyAvailable { data, .. } => Ok(data.clone()),
        }
    }
}
