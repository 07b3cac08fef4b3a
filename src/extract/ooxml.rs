//! Text extraction from Office Open XML containers (docx, pptx, xlsx).
//!
//! These are zip archives of XML parts. Paragraphs (docx, pptx) and sheet
//! rows (xlsx) become lines; formatting and images are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use super::backend::ConversionError;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SHEET_PREFIX: &str = "xl/worksheets/sheet";

/// Whether a type tag is handled by the built-in OOXML reader.
pub fn is_ooxml(tag: &str) -> bool {
    matches!(tag, "docx" | "pptx" | "xlsx")
}

/// Extract plain text from an OOXML file, one paragraph or row per line.
pub fn extract_text(path: &Path, tag: &str) -> Result<String, ConversionError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| ConversionError::ConversionFailed(format!("invalid {} container: {}", tag, e)))?;

    let lines = match tag {
        "docx" => {
            let xml = read_part(&mut archive, "word/document.xml")?;
            paragraphs(&xml)?
        }
        "pptx" => {
            let mut lines = Vec::new();
            for part in numbered_parts(&archive, SLIDE_PREFIX) {
                let xml = read_part(&mut archive, &part)?;
                lines.extend(paragraphs(&xml)?);
            }
            lines
        }
        "xlsx" => {
            let shared = match archive.index_for_name("xl/sharedStrings.xml") {
                Some(_) => shared_strings(&read_part(&mut archive, "xl/sharedStrings.xml")?)?,
                None => Vec::new(),
            };
            let mut lines = Vec::new();
            for part in numbered_parts(&archive, SHEET_PREFIX) {
                let xml = read_part(&mut archive, &part)?;
                lines.extend(sheet_rows(&xml, &shared)?);
            }
            lines
        }
        other => return Err(ConversionError::UnsupportedFileType(other.to_string())),
    };

    Ok(lines.join("\n"))
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<String, ConversionError> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| ConversionError::ConversionFailed(format!("missing part {}: {}", name, e)))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Parts named `<prefix><n>.xml`, ordered by `n` (slide2 before slide10).
fn numbered_parts(archive: &ZipArchive<File>, prefix: &str) -> Vec<String> {
    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name.strip_prefix(prefix)?.strip_suffix(".xml")?.parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    parts.sort();
    parts.into_iter().map(|(_, name)| name).collect()
}

fn xml_error(e: impl std::fmt::Display) -> ConversionError {
    ConversionError::ConversionFailed(format!("malformed XML: {}", e))
}

/// Text of each `<p>` paragraph (`w:p` in Word, `a:p` in DrawingML).
///
/// Only `<t>` content is kept. Tabs and breaks inside runs become `\t` and
/// `\n`; tab stops declared in paragraph properties are ignored.
fn paragraphs(xml: &str) -> Result<Vec<String>, ConversionError> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if in_run => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape().map_err(xml_error)?),
            Event::CData(t) if in_text => current.push_str(&String::from_utf8_lossy(&t)),
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => lines.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines)
}

/// Strings of `xl/sharedStrings.xml`, by index. Rich-text runs are joined
/// and phonetic hints skipped.
fn shared_strings(xml: &str) -> Result<Vec<String>, ConversionError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" if !in_phonetic => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape().map_err(xml_error)?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"si" => strings.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

/// Value of a cell's `t` attribute (`n` when absent).
fn cell_type(cell: &BytesStart) -> String {
    cell.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"t")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
        .unwrap_or_else(|| "n".to_string())
}

/// Non-empty rows of a worksheet, cells separated by tabs.
fn sheet_rows(xml: &str, shared: &[String]) -> Result<Vec<String>, ConversionError> {
    let mut reader = Reader::from_str(xml);
    let mut rows = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut kind = String::new();
    let mut value = String::new();
    let mut in_value = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"c" => {
                    kind = cell_type(&e);
                    value.clear();
                }
                // <v> holds stored values; <t> holds inline strings
                b"v" | b"t" => in_value = true,
                _ => {}
            },
            Event::Text(t) if in_value => value.push_str(&t.unescape().map_err(xml_error)?),
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    let text = match kind.as_str() {
                        "s" => value
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|i| shared.get(i).cloned())
                            .unwrap_or_default(),
                        "b" => match value.trim() {
                            "1" => "TRUE".to_string(),
                            "0" => "FALSE".to_string(),
                            other => other.to_string(),
                        },
                        _ => std::mem::take(&mut value),
                    };
                    if !text.is_empty() {
                        cells.push(text);
                    }
                }
                b"row" => {
                    if !cells.is_empty() {
                        rows.push(cells.join("\t"));
                        cells.clear();
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_container(parts: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut zip = zip::ZipWriter::new(std::fs::File::create(file.path()).unwrap());
        for (name, body) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        file
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = r#"<w:document><w:body>
            <w:p><w:pPr/><w:r><w:t>INTRODUCTION</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Tom &amp; </w:t></w:r><w:r><w:t>Jerry</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let file = write_container(&[("word/document.xml", xml)]);

        let text = extract_text(file.path(), "docx").unwrap();
        assert_eq!(text, "INTRODUCTION\nTom & Jerry");
    }

    #[test]
    fn test_docx_self_closing_text_run() {
        let xml = r#"<w:document><w:body><w:p>
            <w:r><w:t xml:space="preserve"/></w:r><w:r><w:t>Hello</w:t></w:r>
        </w:p></w:body></w:document>"#;
        let file = write_container(&[("word/document.xml", xml)]);

        let text = extract_text(file.path(), "docx").unwrap();
        assert_eq!(text, "Hello");
    }

    #[test]
    fn test_docx_tabs_and_tab_stops() {
        let xml = r#"<w:document><w:body><w:p>
            <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
            <w:r><w:t>Name</w:t><w:tab/><w:t>Value</w:t></w:r>
        </w:p></w:body></w:document>"#;
        let file = write_container(&[("word/document.xml", xml)]);

        let text = extract_text(file.path(), "docx").unwrap();
        assert_eq!(text, "Name\tValue");
    }

    #[test]
    fn test_pptx_slide_order() {
        let slide = |t: &str| format!("<p:sld><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:sld>", t);
        let first = slide("first");
        let tenth = slide("tenth");
        let second = slide("second");
        let file = write_container(&[
            ("ppt/slides/slide10.xml", tenth.as_str()),
            ("ppt/slides/slide1.xml", first.as_str()),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
            ("ppt/slides/slide2.xml", second.as_str()),
        ]);

        let text = extract_text(file.path(), "pptx").unwrap();
        assert_eq!(text, "first\nsecond\ntenth");
    }

    #[test]
    fn test_xlsx_shared_strings() {
        let strings = r#"<sst><si><t>Name</t></si><si><r><t>Total</t></r><r><t xml:space="preserve"> &#36;</t></r></si></sst>"#;
        let sheet = r#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
        </sheetData></worksheet>"#;
        let file = write_container(&[
            ("xl/sharedStrings.xml", strings),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);

        let text = extract_text(file.path(), "xlsx").unwrap();
        assert_eq!(text, "Name\tTotal $");
    }

    #[test]
    fn test_xlsx_numbers_and_inline_strings() {
        let sheet = r#"<worksheet><sheetData>
            <row r="1"><c r="A1"><v>42</v></c><c r="B1" t="inlineStr"><is><t>Total</t></is></c></row>
            <row r="2"><c r="A2"/></row>
            <row r="3"><c r="A3" t="b"><v>1</v></c><c r="B3"><f>SUM(A1)</f><v>42</v></c></row>
        </sheetData></worksheet>"#;
        let file = write_container(&[("xl/worksheets/sheet1.xml", sheet)]);

        let text = extract_text(file.path(), "xlsx").unwrap();
        assert_eq!(text, "42\tTotal\nTRUE\t42");
    }

    #[test]
    fn test_xlsx_sheet_order() {
        let sheet = |v: &str| format!("<worksheet><sheetData><row><c t=\"inlineStr\"><is><t>{}</t></is></c></row></sheetData></worksheet>", v);
        let one = sheet("one");
        let two = sheet("two");
        let file = write_container(&[
            ("xl/worksheets/sheet2.xml", two.as_str()),
            ("xl/worksheets/sheet1.xml", one.as_str()),
        ]);

        let text = extract_text(file.path(), "xlsx").unwrap();
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn test_malformed_xml() {
        let file = write_container(&[("word/document.xml", "<w:p><w:t>open</w:p>")]);

        let err = extract_text(file.path(), "docx").unwrap_err();
        assert!(matches!(err, ConversionError::ConversionFailed(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a zip").unwrap();

        let err = extract_text(file.path(), "docx").unwrap_err();
        assert!(matches!(err, ConversionError::ConversionFailed(_)));
    }
}
