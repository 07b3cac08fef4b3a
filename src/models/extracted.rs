//! The structured document produced by the extraction pipeline.
//!
//! This is what gets serialized into `file_records.json_data` and returned
//! to uploaders.

use serde::{Deserialize, Serialize};

/// Number of characters kept in `text_summary`.
pub const SUMMARY_CHARS: usize = 500;

/// Classification of extracted entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Email,
    Phone,
    Url,
    Date,
    Person,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Date => "date",
            Self::Person => "person",
        }
    }

    /// Fixed confidence assigned to every match of this type.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Email | Self::Url => 0.9,
            Self::Phone => 0.8,
            Self::Date => 0.7,
            Self::Person => 0.6,
        }
    }
}

/// A single pattern match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub value: String,
    pub confidence: f64,
}

impl Entity {
    pub fn new(entity_type: EntityType, value: impl Into<String>) -> Self {
        Self {
            entity_type,
            value: value.into(),
            confidence: entity_type.confidence(),
        }
    }
}

/// A titled run of text lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
    pub level: u8,
}

/// Which extraction path produced `full_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    DirectDecode,
    DocumentConversion,
    FallbackProcessing,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectDecode => "direct_decode",
            Self::DocumentConversion => "document_conversion",
            Self::FallbackProcessing => "fallback_processing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: ExtractionSource,
    pub file_type: String,
    pub text_length: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub extraction_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Counts derived from the entity and section lists at construction time.
///
/// Dates are matched but intentionally have no counter of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_entities: usize,
    pub total_sections: usize,
    pub email_count: usize,
    pub phone_count: usize,
    pub url_count: usize,
    pub person_count: usize,
}

impl Statistics {
    pub fn from_parts(entities: &[Entity], sections: &[Section]) -> Self {
        let count = |t: EntityType| entities.iter().filter(|e| e.entity_type == t).count();
        Self {
            total_entities: entities.len(),
            total_sections: sections.len(),
            email_count: count(EntityType::Email),
            phone_count: count(EntityType::Phone),
            url_count: count(EntityType::Url),
            person_count: count(EntityType::Person),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub full_text: String,
    pub text_summary: String,
    pub metadata: DocumentMetadata,
    pub entities: Vec<Entity>,
    pub sections: Vec<Section>,
    /// Raw payload reported by the conversion backend, or `{"error": ...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_extraction: Option<serde_json::Value>,
    pub statistics: Statistics,
}

impl ExtractedDocument {
    /// Assemble a document; text metrics and statistics are computed here and
    /// never recomputed afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        full_text: String,
        file_type: &str,
        source: ExtractionSource,
        extraction_method: &str,
        error: Option<String>,
        entities: Vec<Entity>,
        sections: Vec<Section>,
        backend_extraction: Option<serde_json::Value>,
    ) -> Self {
        let metadata = DocumentMetadata {
            source,
            file_type: file_type.to_string(),
            text_length: full_text.chars().count(),
            word_count: full_text.split_whitespace().count(),
            line_count: full_text.split('\n').count(),
            extraction_method: extraction_method.to_string(),
            error,
        };
        let statistics = Statistics::from_parts(&entities, &sections);

        Self {
            text_summary: summarize(&full_text),
            full_text,
            metadata,
            entities,
            sections,
            backend_extraction,
            statistics,
        }
    }
}

/// First [`SUMMARY_CHARS`] characters, with "..." appended when truncated.
pub fn summarize(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_at_limit_is_untouched() {
        let text = "a".repeat(SUMMARY_CHARS);
        assert_eq!(summarize(&text), text);
    }

    #[test]
    fn test_summary_over_limit_is_truncated() {
        let text = "b".repeat(SUMMARY_CHARS + 1);
        let summary = summarize(&text);
        assert_eq!(summary, format!("{}...", "b".repeat(SUMMARY_CHARS)));
    }

    #[test]
    fn test_summary_counts_characters_not_bytes() {
        let text = "é".repeat(SUMMARY_CHARS);
        assert_eq!(summarize(&text), text);
    }

    #[test]
    fn test_statistics_skip_dates() {
        let entities = vec![
            Entity::new(EntityType::Email, "a@b.com"),
            Entity::new(EntityType::Date, "01/02/2023"),
            Entity::new(EntityType::Person, "John Smith"),
        ];
        let stats = Statistics::from_parts(&entities, &[]);

        assert_eq!(stats.total_entities, 3);
        assert_eq!(stats.email_count, 1);
        assert_eq!(stats.person_count, 1);
        assert_eq!(stats.phone_count + stats.url_count, 0);
    }

    #[test]
    fn test_metadata_metrics() {
        let doc = ExtractedDocument::new(
            "one two\nthree".to_string(),
            "txt",
            ExtractionSource::DirectDecode,
            "utf8_decode",
            None,
            vec![],
            vec![],
            None,
        );

        assert_eq!(doc.metadata.text_length, 13);
        assert_eq!(doc.metadata.word_count, 3);
        assert_eq!(doc.metadata.line_count, 2);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["metadata"]["source"], "direct_decode");
        assert!(json["metadata"].get("error").is_none());
        assert!(json.get("backend_extraction").is_none());
    }

    #[test]
    fn test_entity_serializes_type_key() {
        let json = serde_json::to_value(Entity::new(EntityType::Url, "https://x.com")).unwrap();
        assert_eq!(json["type"], "url");
        assert_eq!(json["confidence"], 0.9);
    }
}
