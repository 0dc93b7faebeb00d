use tracing::{debug, warn};

use super::ExtractionError;

/// Decode as UTF-8, falling back to Latin-1. Text is returned untrimmed.
pub fn extract_txt(bytes: &[u8]) -> Result<String, ExtractionError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(utf8_err) => {
            debug!("UTF-8 decode failed ({}), retrying as Latin-1", utf8_err);
            let text = decode_latin1(bytes);
            // Latin-1 accepts any byte; NULs mean a binary file with a .txt name.
            if text.contains('\0') {
                warn!("Text file contains NUL bytes, refusing to decode");
                return Err(ExtractionError::Decode(utf8_err));
            }
            Ok(text)
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let text = extract_txt(b"Hello, world!\nThis is a test file.").unwrap();
        assert_eq!(text, "Hello, world!\nThis is a test file.");
    }

    #[test]
    fn extract_utf8_text() {
        let content = "Ünïcödé text with émojis 🎉".as_bytes();
        assert_eq!(extract_txt(content).unwrap(), "Ünïcödé text with émojis 🎉");
    }

    #[test]
    fn latin1_fallback() {
        // "café crème" in ISO-8859-1
        let bytes = b"caf\xe9 cr\xe8me";
        assert!(std::str::from_utf8(bytes).is_err());
        assert_eq!(extract_txt(bytes).unwrap(), "café crème");
    }

    #[test]
    fn latin1_fallback_keeps_high_bytes() {
        let bytes: Vec<u8> = (0x20u8..=0xff).collect();
        let text = extract_txt(&bytes).unwrap();
        assert_eq!(text.chars().count(), bytes.len());
        assert_eq!(text.chars().last(), Some('ÿ'));
    }

    #[test]
    fn binary_content_is_a_decode_error() {
        let bytes = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
        assert!(matches!(extract_txt(bytes), Err(ExtractionError::Decode(_))));
    }

    #[test]
    fn empty_text_is_allowed() {
        assert_eq!(extract_txt(b"").unwrap(), "");
    }

    #[test]
    fn whitespace_is_preserved() {
        assert_eq!(extract_txt(b"  \n  Hello  \n  ").unwrap(), "  \n  Hello  \n  ");
    }
}
