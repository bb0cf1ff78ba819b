//! Single-byte (ISO-8859-1) text encoding for frame payloads.
//!
//! Clients are embedded runtimes without Unicode support, so script text and
//! replies travel as one byte per character.

/// Byte written for characters outside the Latin-1 range.
pub const REPLACEMENT: u8 = b'?';

/// Encode text as Latin-1, replacing unmappable characters with `?`.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT))
        .collect()
}

/// Decode Latin-1 bytes. Every byte maps to exactly one `char`.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
