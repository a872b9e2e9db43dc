//! Bounded decoding of compact token segments
//!
//! Segments are unpadded Base64URL. Both helpers refuse input whose decoded
//! form would exceed the caller's limit, checking an estimate from the input
//! length before allocating and the real length after.

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

fn too_large(size: usize, max: usize) -> Error {
    Error::FormatInvalidBase64(format!("segment decodes to {size} bytes (max: {max})"))
}

pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    // Full 4-char groups alone yield this many bytes
    let estimate = input.len() / 4 * 3;
    if estimate > max_size {
        return Err(too_large(estimate, max_size));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::FormatInvalidBase64(format!("segment is not Base64URL: {e}")))?;

    match bytes.len() {
        size if size > max_size => Err(too_large(size, max_size)),
        _ => Ok(bytes),
    }
}

/// Decode a segment that must hold UTF-8 text, such as a JSON header
pub(crate) fn decode_string(input: &str, max_size: usize) -> Result<String> {
    let bytes = decode_bytes(input, max_size)?;
    String::from_utf8(bytes)
        .map_err(|e| Error::FormatInvalidBase64(format!("segment is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_segment() {
        // {"alg":"RS256"}
        assert_eq!(
            decode_string("eyJhbGciOiJSUzI1NiJ9", 64).unwrap(),
            r#"{"alg":"RS256"}"#
        );
    }

    #[test]
    fn test_rejects_non_url_alphabet() {
        assert!(decode_bytes("ab+/", 64).is_err());
        assert!(decode_bytes("eyJ9=", 64).is_err());
        assert!(decode_bytes("e y J", 64).is_err());
    }

    #[test]
    fn test_limit_is_inclusive() {
        // "claims" is 6 bytes
        assert_eq!(decode_bytes("Y2xhaW1z", 6).unwrap(), b"claims");
        assert!(matches!(
            decode_bytes("Y2xhaW1z", 5),
            Err(Error::FormatInvalidBase64(msg)) if msg.contains("max: 5")
        ));
    }

    #[test]
    fn test_oversized_input_rejected_before_decoding() {
        // Not valid Base64URL either; the size check fires first
        let input = "!".repeat(4_000);
        assert!(matches!(
            decode_bytes(&input, 1_000),
            Err(Error::FormatInvalidBase64(msg)) if msg.contains("3000 bytes")
        ));
    }

    #[test]
    fn test_empty_segment() {
        assert!(decode_bytes("", 0).unwrap().is_empty());
        assert_eq!(decode_string("", 0).unwrap(), "");
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        // 0xFF 0xFE
        assert!(matches!(
            decode_string("__4", 10),
            Err(Error::FormatInvalidBase64(msg)) if msg.contains("UTF-8")
        ));
    }
}
