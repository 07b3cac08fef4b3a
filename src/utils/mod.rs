//! Shared utility functions.
//!
//! - `mime`: type detection and canonical type tags
//! - `text`: lossy decoding helpers

mod mime;
mod text;

pub use mime::{extension_to_tag, is_plain_text, mime_to_tag, TypeDetector, UNKNOWN_TYPE};
pub use text::{decode_lossy, escape_bytes};
