//! End-to-end tests of the ingestion pipeline over a real SQLite database.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use docingest::extract::{
    ConversionBackend, ConversionError, ConvertedDocument, ExportCapability, TextExtractor,
};
use docingest::models::{Fingerprint, ProcessResult};
use docingest::repository::{DbContext, FileStore};
use docingest::services::FileProcessor;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

async fn setup(extractor: TextExtractor) -> (FileProcessor, DbContext, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("pipeline.db");

    let ctx = DbContext::from_url(&format!("sqlite:{}", db_path.display())).unwrap();
    let applied = ctx.migrate().await.unwrap();
    assert!(!applied.is_empty());

    let processor = FileProcessor::new(ctx.file_store(), Arc::new(extractor));
    (processor, ctx, dir)
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!("<w:document><w:body>{}</w:body></w:document>", body);

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Backend that returns markdown for any input.
struct MarkdownBackend;

impl ConversionBackend for MarkdownBackend {
    fn backend_id(&self) -> &str {
        "markdown-stub"
    }

    fn capability(&self) -> ExportCapability {
        ExportCapability::MarkdownExportable
    }

    fn convert(&self, path: &Path, type_hint: &str) -> Result<ConvertedDocument, ConversionError> {
        let bytes = std::fs::read(path)?;
        Ok(ConvertedDocument {
            markdown: Some(format!("CONVERTED\n{} bytes of {}", bytes.len(), type_hint)),
            text: None,
            structure: serde_json::json!({ "pages": 1 }),
        })
    }
}

#[tokio::test]
async fn test_text_upload_roundtrip() {
    let (processor, ctx, _dir) = setup(TextExtractor::default()).await;
    let content = b"Contact: a@b.com or visit https://x.com on 01/02/2023, ask John Smith".to_vec();

    let first = processor.process(content.clone(), "contact.txt").await.unwrap();
    assert_eq!(first.status(), "processed");
    assert_eq!(first.file_hash(), Fingerprint::compute(&content).as_str());

    let second = processor.process(content, "other-name.txt").await.unwrap();
    assert_eq!(second.status(), "already_available");
    assert_eq!(second.filename(), "contact.txt");
    assert_eq!(first.data_value().unwrap(), second.data_value().unwrap());

    assert_eq!(ctx.files().count().await.unwrap(), 1);

    let data = first.data_value().unwrap();
    assert_eq!(data["metadata"]["extraction_method"], "utf8_decode");
    assert_eq!(data["statistics"]["email_count"], 1);
    assert_eq!(data["statistics"]["url_count"], 1);
    assert_eq!(data["statistics"]["person_count"], 1);
    assert_eq!(data["statistics"]["phone_count"], 0);
}

#[tokio::test]
async fn test_docx_converted_by_toolchain() {
    let (processor, _ctx, _dir) = setup(TextExtractor::default()).await;
    let content = docx_bytes(&["QUARTERLY REPORT", "Revenue grew.", "Email cfo@corp.example"]);

    let result = processor.process(content, "report.docx").await.unwrap();
    let ProcessResult::Processed { data, file_type, .. } = result else {
        panic!("expected a freshly processed document");
    };

    assert_eq!(file_type, "docx");
    assert_eq!(data.metadata.source.as_str(), "document_conversion");
    assert_eq!(data.metadata.extraction_method, "toolchain");
    assert!(data.full_text.contains("Revenue grew."));
    assert_eq!(data.sections[0].title, "QUARTERLY REPORT");
    assert_eq!(data.statistics.email_count, 1);
    assert!(data.backend_extraction.is_some());
}

#[tokio::test]
async fn test_markdown_capability_backend() {
    let extractor = TextExtractor::new(Arc::new(MarkdownBackend));
    let (processor, _ctx, _dir) = setup(extractor).await;

    let result = processor
        .process(b"%PDF-1.4 not really".to_vec(), "scan.pdf")
        .await
        .unwrap();
    let data = result.data_value().unwrap();

    assert_eq!(data["metadata"]["file_type"], "pdf");
    assert_eq!(data["metadata"]["extraction_method"], "markdown-stub");
    assert_eq!(data["backend_extraction"]["pages"], 1);
    assert_eq!(data["sections"][0]["title"], "CONVERTED");
}

#[tokio::test]
async fn test_stored_record_matches_response() {
    let (processor, ctx, _dir) = setup(TextExtractor::default()).await;
    let content = b"HELLO\nworld\n1. Intro\nmore text".to_vec();
    let fingerprint = Fingerprint::compute(&content);

    let result = processor.process(content.clone(), "hello.txt").await.unwrap();

    let store = ctx.file_store();
    let record = store.find_by_fingerprint(&fingerprint).await.unwrap().unwrap();
    assert_eq!(record.raw_content, content);
    assert_eq!(record.detected_type, "txt");
    assert_eq!(record.extracted_value().unwrap(), result.data_value().unwrap());

    let by_id = store.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(by_id.fingerprint, fingerprint);
}

#[tokio::test]
async fn test_concurrent_duplicate_uploads() {
    let (processor, ctx, _dir) = setup(TextExtractor::default()).await;
    let content = b"same bytes from many clients".to_vec();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let processor = processor.clone();
            let content = content.clone();
            tokio::spawn(async move {
                processor
                    .process(content, &format!("copy-{}.txt", i))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut processed = 0;
    let mut hashes = Vec::new();
    for handle in handles {
        let result = handle.await.unwrap();
        if result.status() == "processed" {
            processed += 1;
        }
        hashes.push(result.file_hash().to_string());
    }

    assert_eq!(processed, 1);
    assert!(hashes.iter().all(|h| h == &hashes[0]));
    assert_eq!(ctx.files().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_extensionless_text_is_decoded_directly() {
    let (processor, _ctx, _dir) = setup(TextExtractor::default()).await;

    let result = processor
        .process(b"Meeting notes\nCall John Smith at a@b.com".to_vec(), "NOTES")
        .await
        .unwrap();
    let data = result.data_value().unwrap();

    assert_eq!(data["metadata"]["file_type"], "txt");
    assert_eq!(data["metadata"]["source"], "direct_decode");
    assert!(data["metadata"].get("error").is_none());
    assert_eq!(data["statistics"]["email_count"], 1);
}
