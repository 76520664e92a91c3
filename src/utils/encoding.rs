//! Text decoding with BOM detection and encoding fallback.
//!
//! Files are read as bytes by the loader and decoded here:
//! - BOM detection (UTF-8, UTF-16 LE/BE)
//! - UTF-8 fast-path with strict validation
//! - Fallback encoding detection using chardetng
//! - Replacement characters for anything undecodable, so decoding never fails

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Detect the encoding of a byte buffer.
///
/// Looks at the first `sample_size` bytes only. BOMs win, then strict UTF-8,
/// then chardetng's guess.
pub fn detect_encoding(bytes: &[u8], sample_size: usize) -> &'static Encoding {
    let sample = &bytes[..bytes.len().min(sample_size)];

    if sample.is_empty() {
        return UTF_8;
    }

    if let Some((encoding, _bom_len)) = Encoding::for_bom(sample) {
        return encoding;
    }

    // A multi-byte sequence may be cut at the sample boundary
    match std::str::from_utf8(sample) {
        Ok(_) => return UTF_8,
        Err(e) if e.error_len().is_none() && sample.len() < bytes.len() => return UTF_8,
        Err(_) => {}
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

/// Decode bytes into text, returning the content and a lowercase charset label.
pub fn decode_text(bytes: &[u8]) -> (String, String) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        // Strip a UTF-8 BOM so consumers see the same text either way
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        return (text.to_string(), charset_label(UTF_8));
    }

    let encoding = detect_encoding(bytes, DEFAULT_SAMPLE_SIZE);
    let (decoded, used, _had_errors) = encoding.decode(bytes);
    (decoded.into_owned(), charset_label(used))
}

fn charset_label(encoding: &'static Encoding) -> String {
    encoding.name().to_ascii_lowercase()
}
