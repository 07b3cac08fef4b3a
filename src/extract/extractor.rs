//! Tiered text extraction.
//!
//! 1. Plain-text types are decoded directly.
//! 2. Everything else goes through the configured [`ConversionBackend`].
//! 3. If conversion fails, the raw bytes are decoded best-effort.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use super::backend::{ConversionBackend, ConversionError, ConvertedDocument, ExportCapability};
use super::toolchain::ToolchainBackend;
use crate::models::ExtractionSource;
use crate::utils::{decode_lossy, escape_bytes, is_plain_text};

/// Method used to extract text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// UTF-8 decode of a plain-text upload.
    DirectDecode,
    /// Conversion through the named backend.
    Conversion(String),
    /// Best-effort decode after a conversion failure.
    Fallback,
}

impl ExtractionMethod {
    /// Value recorded as `metadata.extraction_method`.
    pub fn label(&self) -> &str {
        match self {
            Self::DirectDecode => "utf8_decode",
            Self::Conversion(backend) => backend,
            Self::Fallback => "fallback",
        }
    }

    /// Value recorded as `metadata.source`.
    pub fn source(&self) -> ExtractionSource {
        match self {
            Self::DirectDecode => ExtractionSource::DirectDecode,
            Self::Conversion(_) => ExtractionSource::DocumentConversion,
            Self::Fallback => ExtractionSource::FallbackProcessing,
        }
    }
}

/// Result of text extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Extracted text content.
    pub text: String,
    /// Method used for extraction.
    pub method: ExtractionMethod,
    /// Raw backend payload, or `{"error": ...}` after a failed conversion.
    pub backend_payload: Option<Value>,
    /// Conversion error message on the fallback path.
    pub error: Option<String>,
}

impl Extraction {
    /// Best-effort decode of raw bytes, used when conversion is unavailable.
    ///
    /// Never returns an empty string for non-empty input.
    pub fn fallback(content: &[u8], error: impl Into<String>) -> Self {
        let error = error.into();
        let mut text = decode_lossy(content);
        if text.is_empty() && !content.is_empty() {
            text = escape_bytes(content);
        }

        Self {
            text,
            method: ExtractionMethod::Fallback,
            backend_payload: Some(serde_json::json!({ "error": error })),
            error: Some(error),
        }
    }
}

/// Text extractor with a pluggable conversion backend.
pub struct TextExtractor {
    backend: Arc<dyn ConversionBackend>,
    /// Resolved once from the backend at construction.
    capability: ExportCapability,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(Arc::new(ToolchainBackend::default()))
    }
}

impl TextExtractor {
    /// Create an extractor over the given backend.
    pub fn new(backend: Arc<dyn ConversionBackend>) -> Self {
        let capability = backend.capability();
        tracing::debug!(
            "Text extractor using backend {} ({} export)",
            backend.backend_id(),
            capability.as_str()
        );
        Self {
            backend,
            capability,
        }
    }

    pub fn backend_id(&self) -> &str {
        self.backend.backend_id()
    }

    pub fn capability(&self) -> ExportCapability {
        self.capability
    }

    /// Extract text from a file's bytes. Never fails; conversion errors are
    /// reported through [`Extraction::error`].
    pub fn extract(&self, content: &[u8], type_tag: &str, filename: &str) -> Extraction {
        if is_plain_text(type_tag) {
            let text = decode_lossy(content);
            if !text.trim().is_empty() {
                tracing::debug!("Decoded {} directly", filename);
                return Extraction {
                    text,
                    method: ExtractionMethod::DirectDecode,
                    backend_payload: None,
                    error: None,
                };
            }
        }

        match self.convert(content, type_tag) {
            Ok((text, payload)) => {
                tracing::debug!("Converted {} with {}", filename, self.backend_id());
                Extraction {
                    text,
                    method: ExtractionMethod::Conversion(self.backend_id().to_string()),
                    backend_payload: Some(payload),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Conversion of {} failed, using raw decode: {}", filename, e);
                Extraction::fallback(content, e.to_string())
            }
        }
    }

    /// Run the backend on a temporary copy of the content.
    fn convert(&self, content: &[u8], type_tag: &str) -> Result<(String, Value), ConversionError> {
        // Removed when dropped, including on error
        let mut temp = tempfile::Builder::new()
            .prefix("docingest-")
            .suffix(&format!(".{}", type_tag))
            .tempfile()?;
        temp.write_all(content)?;
        temp.flush()?;

        let converted = self.backend.convert(temp.path(), type_tag)?;
        let text = self.export_text(&converted)?;
        if text.trim().is_empty() {
            return Err(ConversionError::EmptyOutput);
        }

        Ok((text, converted.structure))
    }

    fn export_text(&self, converted: &ConvertedDocument) -> Result<String, ConversionError> {
        match self.capability {
            ExportCapability::MarkdownExportable => converted
                .markdown
                .clone()
                .ok_or(ConversionError::ExportUnavailable("markdown")),
            ExportCapability::PlainTextExportable => converted
                .text
                .clone()
                .ok_or(ConversionError::ExportUnavailable("plain text")),
            ExportCapability::OpaqueStructured => Ok(match &converted.structure {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            }),
        }
    }
}
