//! Document conversion backend abstraction.
//!
//! A backend turns a file on disk into text. Different backends expose their
//! output differently (markdown, plain text, or only a structured payload), so
//! each one declares an [`ExportCapability`] that the extractor resolves once.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Errors from conversion backends.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Conversion produced no text")]
    EmptyOutput,

    #[error("Backend does not provide {0} export")]
    ExportUnavailable(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a backend exposes converted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportCapability {
    /// `ConvertedDocument::markdown` is populated.
    MarkdownExportable,
    /// `ConvertedDocument::text` is populated.
    PlainTextExportable,
    /// Only `ConvertedDocument::structure` is meaningful.
    OpaqueStructured,
}

impl ExportCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarkdownExportable => "markdown",
            Self::PlainTextExportable => "plain_text",
            Self::OpaqueStructured => "structured",
        }
    }
}

/// Output of a single conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertedDocument {
    pub markdown: Option<String>,
    pub text: Option<String>,
    /// Backend-specific payload, stored verbatim as `backend_extraction`.
    pub structure: serde_json::Value,
}

/// Trait for document conversion backends.
pub trait ConversionBackend: Send + Sync {
    /// Identifier recorded as `extraction_method` (e.g. "toolchain").
    fn backend_id(&self) -> &str;

    /// Which export this backend populates.
    fn capability(&self) -> ExportCapability;

    /// Convert the file at `path`. `type_hint` is the detected type tag.
    fn convert(&self, path: &Path, type_hint: &str) -> Result<ConvertedDocument, ConversionError>;
}
