//! Lightweight structure extraction from plain text.
//!
//! - `entities`: regex matchers for emails, phones, URLs, dates and names
//! - `sections`: heading detection and section splitting

mod entities;
mod sections;

pub use entities::{extract_entities, EntityExtractor, RegexEntityExtractor};
pub use sections::{extract_sections, MAIN_SECTION_TITLE};
