//! Lossy decoding helpers.

/// Decode UTF-8, silently dropping invalid byte sequences.
pub fn decode_lossy(content: &[u8]) -> String {
    content.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Render raw bytes as an escaped byte-string literal, e.g. `b"\xff\x00"`.
pub fn escape_bytes(content: &[u8]) -> String {
    format!("b\"{}\"", content.escape_ascii())
}
