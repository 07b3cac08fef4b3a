//! Default conversion backend built on command-line tools.
//!
//! - pdftotext (Poppler) for PDF
//! - built-in OOXML reader for docx/pptx/xlsx
//! - antiword for legacy Word (.doc)
//! - pandoc for OpenDocument, RTF, EPUB and HTML

use std::path::Path;
use std::process::Command;

use super::backend::{ConversionBackend, ConversionError, ConvertedDocument, ExportCapability};
use super::ooxml;

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ConversionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ConversionError::ConversionFailed(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConversionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ConversionError::Io(e)),
    }
}

/// Type tags routed to pandoc, with the pandoc reader name for each.
fn pandoc_reader(tag: &str) -> Option<&'static str> {
    match tag {
        "odt" => Some("odt"),
        "rtf" => Some("rtf"),
        "epub" => Some("epub"),
        "html" | "htm" => Some("html"),
        _ => None,
    }
}

/// Conversion backend that shells out to pdftotext, antiword and pandoc.
#[derive(Debug, Clone)]
pub struct ToolchainBackend {
    pdftotext: String,
    antiword: String,
    pandoc: String,
}

impl Default for ToolchainBackend {
    fn default() -> Self {
        Self {
            pdftotext: "pdftotext".to_string(),
            antiword: "antiword".to_string(),
            pandoc: "pandoc".to_string(),
        }
    }
}

impl ToolchainBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the pdftotext binary.
    pub fn with_pdftotext(mut self, binary: impl Into<String>) -> Self {
        self.pdftotext = binary.into();
        self
    }

    /// Override the antiword binary.
    pub fn with_antiword(mut self, binary: impl Into<String>) -> Self {
        self.antiword = binary.into();
        self
    }

    /// Override the pandoc binary.
    pub fn with_pandoc(mut self, binary: impl Into<String>) -> Self {
        self.pandoc = binary.into();
        self
    }

    /// External tools this backend may call, with availability.
    pub fn check_tools(&self) -> Vec<(String, bool)> {
        [
            self.pdftotext.as_str(),
            self.antiword.as_str(),
            self.pandoc.as_str(),
        ]
            .iter()
            .map(|tool| (tool.to_string(), check_binary(tool)))
            .collect()
    }

    /// Run pdftotext on a PDF file.
    fn run_pdftotext(&self, file_path: &Path) -> Result<String, ConversionError> {
        let output = Command::new(&self.pdftotext)
            .args(["-layout", "-enc", "UTF-8"])
            .arg(file_path)
            .arg("-") // Output to stdout
            .output();

        handle_cmd_output(
            output,
            &format!("{} (install poppler-utils)", self.pdftotext),
            "pdftotext failed",
        )
    }

    /// Run antiword on a legacy Word document.
    fn run_antiword(&self, file_path: &Path) -> Result<String, ConversionError> {
        // -w 0 disables line wrapping so paragraphs stay on one line
        let output = Command::new(&self.antiword)
            .args(["-w", "0"])
            .arg(file_path)
            .output();

        handle_cmd_output(
            output,
            &format!("{} (install antiword)", self.antiword),
            "antiword failed",
        )
    }

    /// Run pandoc to convert a document to plain text.
    fn run_pandoc(&self, file_path: &Path, reader: &str) -> Result<String, ConversionError> {
        let output = Command::new(&self.pandoc)
            .args(["-f", reader, "-t", "plain", "--wrap=none"])
            .arg(file_path)
            .output();

        handle_cmd_output(
            output,
            &format!("{} (install pandoc)", self.pandoc),
            "pandoc failed",
        )
    }
}

impl ConversionBackend for ToolchainBackend {
    fn backend_id(&self) -> &str {
        "toolchain"
    }

    fn capability(&self) -> ExportCapability {
        ExportCapability::PlainTextExportable
    }

    fn convert(&self, path: &Path, type_hint: &str) -> Result<ConvertedDocument, ConversionError> {
        let (tool, text) = if type_hint == "pdf" {
            ("pdftotext", self.run_pdftotext(path)?)
        } else if type_hint == "doc" {
            ("antiword", self.run_antiword(path)?)
        } else if ooxml::is_ooxml(type_hint) {
            ("ooxml", ooxml::extract_text(path, type_hint)?)
        } else if let Some(reader) = pandoc_reader(type_hint) {
            ("pandoc", self.run_pandoc(path, reader)?)
        } else {
            return Err(ConversionError::UnsupportedFileType(type_hint.to_string()));
        };

        tracing::debug!("Converted {} with {} ({} bytes)", type_hint, tool, text.len());

        Ok(ConvertedDocument {
            markdown: None,
            structure: serde_json::json!({
                "tool": tool,
                "type": type_hint,
                "characters": text.chars().count(),
            }),
            text: Some(text),
        })
    }
}
