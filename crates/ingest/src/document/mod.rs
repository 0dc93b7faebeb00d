mod docx;
mod pdf;
mod txt;

use std::io::Read;

use study_core::FileType;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("Could not decode text file: {0}")]
    Decode(#[source] std::str::Utf8Error),
    #[error("Could not extract text from {} - it may be scanned, image-based or empty", .0.as_str().to_uppercase())]
    EmptyContent(FileType),
    #[error("{} processing is not available in this build", .0.as_str().to_uppercase())]
    CapabilityUnavailable(FileType),
    #[error("Error processing {} file: {reason}", .file_type.as_str().to_uppercase())]
    Malformed { file_type: FileType, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain text pulled out of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub file_type: FileType,
    pub text: String,
}

impl ExtractedText {
    pub fn word_count(&self) -> u64 {
        study_core::word_count(&self.text)
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Classify an upload by filename suffix. Never touches file contents.
pub fn classify(filename: &str) -> Result<FileType, ExtractionError> {
    FileType::from_filename(filename)
        .map_err(|_| ExtractionError::UnsupportedType(filename.to_string()))
}

/// Extract text from a reader. The type is decided from `filename` before the
/// reader is touched; the reader is then drained exactly once.
pub fn extract<R: Read>(mut reader: R, filename: &str) -> Result<ExtractedText, ExtractionError> {
    let file_type = classify(filename)?;

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    debug!("Read {} bytes from '{}'", bytes.len(), filename);

    let extracted = extract_bytes(&bytes, file_type)?;
    info!(
        "Extracted '{}' (type={}): {} chars",
        filename,
        file_type,
        extracted.char_count()
    );
    Ok(extracted)
}

/// Extract text from bytes already known to be of `file_type`.
pub fn extract_bytes(bytes: &[u8], file_type: FileType) -> Result<ExtractedText, ExtractionError> {
    let text = match file_type {
        FileType::Txt => txt::extract_txt(bytes)?,
        FileType::Pdf => pdf::extract_pdf(bytes)?,
        FileType::Docx => docx::extract_docx(bytes)?,
    };
    Ok(ExtractedText { file_type, text })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that fails the test if anything reads from it.
    struct UntouchableReader;

    impl Read for UntouchableReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            panic!("reader must not be touched for unsupported types");
        }
    }

    #[test]
    fn unsupported_suffix_fails_before_reading() {
        for name in ["grades.csv", "notes", "slides.pptx", "essay.doc"] {
            let err = extract(UntouchableReader, name).unwrap_err();
            assert!(
                matches!(err, ExtractionError::UnsupportedType(ref n) if n == name),
                "unexpected error for {name}: {err}"
            );
        }
    }

    #[test]
    fn utf8_text_round_trips_bytes() {
        let source = "Photosynthesis — light → energy\n\n  indented line\n";
        let extracted = extract(source.as_bytes(), "bio.TXT").unwrap();
        assert_eq!(extracted.file_type, FileType::Txt);
        assert_eq!(extracted.text.as_bytes(), source.as_bytes());
    }

    #[test]
    fn word_count_uses_whitespace() {
        let extracted = extract(&b"alpha beta\n\ngamma"[..], "a.txt").unwrap();
        assert_eq!(extracted.word_count(), 3);
    }

    #[test]
    fn error_messages_name_the_format() {
        assert_eq!(
            ExtractionError::EmptyContent(FileType::Pdf).to_string(),
            "Could not extract text from PDF - it may be scanned, image-based or empty"
        );
        assert_eq!(
            ExtractionError::CapabilityUnavailable(FileType::Docx).to_string(),
            "DOCX processing is not available in this build"
        );
    }

    #[test]
    fn io_errors_surface_as_io() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "gone"))
            }
        }
        assert!(matches!(extract(Broken, "a.txt"), Err(ExtractionError::Io(_))));
    }
}
