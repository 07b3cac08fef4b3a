//! Text extraction module.
//!
//! Converts uploaded bytes to text using:
//! - direct UTF-8 decoding for plain-text uploads
//! - a [`ConversionBackend`] for everything else (default: [`ToolchainBackend`],
//!   which drives pdftotext, pandoc and a built-in OOXML reader)
//! - a raw best-effort decode when conversion fails

mod backend;
mod extractor;
mod ooxml;
mod toolchain;

pub use backend::{ConversionBackend, ConversionError, ConvertedDocument, ExportCapability};
pub use extractor::{Extraction, ExtractionMethod, TextExtractor};
pub use toolchain::{check_binary, ToolchainBackend};
