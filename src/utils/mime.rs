//! MIME type detection and canonical type tags.

/// Canonical tag for files whose type cannot be determined.
pub const UNKNOWN_TYPE: &str = "unknown";

const TEXT_PLAIN: &str = "text/plain";

/// Map a MIME type to its canonical type tag.
pub fn mime_to_tag(mime: &str) -> Option<&'static str> {
    match mime.to_lowercase().as_str() {
        "application/pdf" => Some("pdf"),
        "text/plain" => Some("txt"),
        "text/csv" => Some("csv"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
            Some("pptx")
        }
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some("xlsx"),
        "application/msword" => Some("doc"),
        "application/vnd.ms-powerpoint" => Some("ppt"),
        "application/vnd.ms-excel" => Some("xls"),
        _ => None,
    }
}

/// Derive a type tag from a filename's last extension.
///
/// Known extensions are normalized (`md` becomes `txt`); anything else is
/// returned lower-cased as-is.
pub fn extension_to_tag(filename: &str) -> String {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => return UNKNOWN_TYPE.to_string(),
    };

    match ext.as_str() {
        "pdf" | "docx" | "doc" | "txt" | "csv" | "pptx" | "ppt" | "xlsx" | "xls" => ext,
        "md" => "txt".to_string(),
        _ => ext,
    }
}

/// Whether a type tag is decoded directly instead of converted.
pub fn is_plain_text(tag: &str) -> bool {
    matches!(tag, "txt" | "csv" | "md")
}

/// Detects a file's type tag from its content, falling back to the filename.
#[derive(Debug, Clone)]
pub struct TypeDetector {
    content_sniffing: bool,
}

impl Default for TypeDetector {
    fn default() -> Self {
        Self {
            content_sniffing: true,
        }
    }
}

impl TypeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable magic-byte sniffing.
    pub fn with_content_sniffing(mut self, enabled: bool) -> Self {
        self.content_sniffing = enabled;
        self
    }

    /// Detect the type tag for a file. Never fails.
    pub fn detect(&self, content: &[u8], filename: &str) -> String {
        if self.content_sniffing {
            if let Some(tag) = sniff(content, filename) {
                return tag.to_string();
            }
        }

        extension_to_tag(filename)
    }
}

/// Whether content reads as text: valid UTF-8 with no NUL bytes.
fn looks_like_text(content: &[u8]) -> bool {
    !content.is_empty() && !content.contains(&0) && std::str::from_utf8(content).is_ok()
}

/// Tag from magic bytes. Text content without magic is `text/plain` when the
/// filename carries no usable extension.
fn sniff(content: &[u8], filename: &str) -> Option<&'static str> {
    match infer::get(content).map(|t| t.mime_type()) {
        Some(mime) => {
            let tag = mime_to_tag(mime);
            if tag.is_none() {
                tracing::debug!(
                    "Sniffed unmapped MIME type {} for {}, using extension",
                    mime,
                    filename
                );
            }
            tag
        }
        None if looks_like_text(content) && extension_to_tag(filename) == UNKNOWN_TYPE => {
            tracing::debug!("Sniffed {} as text/plain", filename);
            mime_to_tag(TEXT_PLAIN)
        }
        None => {
            tracing::debug!("Could not sniff content of {}, using extension", filename);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_to_tag() {
        assert_eq!(mime_to_tag("application/pdf"), Some("pdf"));
        assert_eq!(mime_to_tag("application/msword"), Some("doc"));
        assert_eq!(mime_to_tag("image/png"), None);
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(extension_to_tag("Report.PDF"), "pdf");
        assert_eq!(extension_to_tag("notes.md"), "txt");
        assert_eq!(extension_to_tag("archive.tar.GZ"), "gz");
        assert_eq!(extension_to_tag("README"), UNKNOWN_TYPE);
        assert_eq!(extension_to_tag("trailing."), UNKNOWN_TYPE);
    }

    #[test]
    fn test_detect_sniffs_pdf_magic() {
        let detector = TypeDetector::new();
        assert_eq!(detector.detect(b"%PDF-1.7\n%\xe2\xe3", "upload.bin"), "pdf");
    }

    #[test]
    fn test_detect_text_uses_extension() {
        let detector = TypeDetector::new();
        assert_eq!(detector.detect(b"hello world", "hello.txt"), "txt");
        assert_eq!(detector.detect(b"# Title", "readme.md"), "txt");
    }

    #[test]
    fn test_detect_unmapped_mime_uses_extension() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let detector = TypeDetector::new();
        assert_eq!(detector.detect(&png, "scan.png"), "png");
    }

    #[test]
    fn test_detect_extensionless_text() {
        let detector = TypeDetector::new();
        let notes = b"Meeting notes\nCall John Smith at a@b.com";

        assert_eq!(detector.detect(notes, "NOTES"), "txt");
        assert_eq!(detector.detect("caf\u{e9} menu".as_bytes(), "upload"), "txt");
        assert_eq!(detector.detect(b"a,b\n1,2\n", "data.csv"), "csv");
        assert_eq!(detector.detect(b"bin\x00ary", "blob"), UNKNOWN_TYPE);
        assert_eq!(detector.detect(b"\x80\x81\x82", "blob"), UNKNOWN_TYPE);
        assert_eq!(
            TypeDetector::new().with_content_sniffing(false).detect(notes, "NOTES"),
            UNKNOWN_TYPE
        );
    }

    #[test]
    fn test_detect_without_sniffing() {
        let detector = TypeDetector::new().with_content_sniffing(false);
        assert_eq!(detector.detect(b"%PDF-1.7", "upload.bin"), "bin");
    }

    #[test]
    fn test_plain_text_tags() {
        assert!(is_plain_text("txt"));
        assert!(is_plain_text("csv"));
        assert!(!is_plain_text("pdf"));
    }
}
