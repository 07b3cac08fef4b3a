//! Heading-based section splitting.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Section;

/// Title of the section collecting text before the first heading.
pub const MAIN_SECTION_TITLE: &str = "Main Content";

static CAPS_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s]+$").unwrap());
static NUMBERED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s+[A-Z]").unwrap());
static NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.").unwrap());

fn is_heading(line: &str) -> bool {
    CAPS_HEADING.is_match(line) || NUMBERED_HEADING.is_match(line)
}

fn heading_level(line: &str) -> u8 {
    if NUMBER_PREFIX.is_match(line) {
        2
    } else {
        1
    }
}

/// Split text into a flat list of sections.
///
/// Lines are trimmed and blank lines skipped. An all-caps line or a numbered
/// line ("1. Intro") starts a new section; every other line is appended to
/// the current section followed by `\n`. Sections without content are dropped.
pub fn extract_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section {
        title: MAIN_SECTION_TITLE.to_string(),
        content: String::new(),
        level: 1,
    };

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if is_heading(line) {
            let next = Section {
                title: line.to_string(),
                content: String::new(),
                level: heading_level(line),
            };
            let finished = std::mem::replace(&mut current, next);
            if !finished.content.is_empty() {
                sections.push(finished);
            }
        } else {
            current.content.push_str(line);
            current.content.push('\n');
        }
    }

    if !current.content.is_empty() {
        sections.push(current);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_and_numbered_headings() {
        let sections = extract_sections("HELLO\nworld\n1. Intro\nmore text");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "HELLO");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].content, "world\n");
        assert_eq!(sections[1].title, "1. Intro");
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].content, "more text\n");
    }

    #[test]
    fn test_leading_text_goes_to_main_section() {
        let sections = extract_sections("  preface line  \n\nSUMMARY\nbody");

        assert_eq!(sections[0].title, MAIN_SECTION_TITLE);
        assert_eq!(sections[0].content, "preface line\n");
        assert_eq!(sections[1].title, "SUMMARY");
    }

    #[test]
    fn test_empty_sections_are_dropped() {
        let sections = extract_sections("FIRST\nSECOND\n2. Third\ncontent");

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "2. Third");
    }

    #[test]
    fn test_preserves_body_lines_in_order() {
        let text = "alpha\nBETA HEADING\nbeta one\n\nbeta two\n3. Gamma\ngamma one";
        let joined: String = extract_sections(text)
            .iter()
            .map(|s| s.content.as_str())
            .collect();

        assert_eq!(joined, "alpha\nbeta one\nbeta two\ngamma one\n");
    }

    #[test]
    fn test_single_capital_is_not_heading() {
        let sections = extract_sections("A\nI");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "A\nI\n");
    }

    #[test]
    fn test_no_text() {
        assert!(extract_sections("").is_empty());
        assert!(extract_sections("\n  \n").is_empty());
    }
}
