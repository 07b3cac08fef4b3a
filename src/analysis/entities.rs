//! Pattern-based entity extraction.
//!
//! Provides an `EntityExtractor` trait for pluggable extraction backends and a
//! built-in `RegexEntityExtractor`. The patterns are deliberately loose: any
//! two capitalized words count as a person, any ten digits as a phone number.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Entity, EntityType};

/// Trait for pluggable entity extraction backends.
pub trait EntityExtractor: Send + Sync {
    /// Human-readable backend identifier (e.g. "regex").
    fn backend_id(&self) -> &str;

    /// Extract entities from text.
    fn extract(&self, text: &str) -> Vec<Entity>;
}

// ============================================================================
// Patterns
// ============================================================================

// `[A-Z|a-z]` accepts a literal pipe in the TLD; kept as-is.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap()
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:[-\w.])+(?:[:\d]+)?(?:/(?:[\w/_.])*(?:\?(?:[\w&=%.])*)?(?:#(?:[\w.])*)?)?",
    )
    .unwrap()
});

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b|\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b").unwrap()
});

static PERSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").unwrap());

/// Matchers in the order their results are emitted.
fn matchers() -> [(EntityType, &'static Regex); 5] {
    [
        (EntityType::Email, &EMAIL),
        (EntityType::Phone, &PHONE),
        (EntityType::Url, &URL),
        (EntityType::Date, &DATE),
        (EntityType::Person, &PERSON),
    ]
}

// ============================================================================
// RegexEntityExtractor
// ============================================================================

/// Regex-based extractor for emails, phone numbers, URLs, dates and names.
///
/// Matches are grouped by type (emails first, names last) and kept in text
/// order within each group. Duplicates are not removed.
pub struct RegexEntityExtractor;

impl RegexEntityExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RegexEntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for RegexEntityExtractor {
    fn backend_id(&self) -> &str {
        "regex"
    }

    fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        for (entity_type, pattern) in matchers() {
            entities.extend(
                pattern
                    .find_iter(text)
                    .map(|m| Entity::new(entity_type, m.as_str())),
            );
        }
        entities
    }
}

/// Convenience function: extracts entities using the default `RegexEntityExtractor`.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    RegexEntityExtractor.extract(text)
}
