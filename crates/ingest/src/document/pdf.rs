use study_core::FileType;

use super::ExtractionError;

#[cfg(feature = "pdf")]
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    // pdf-extract (and the font parsers under it) can panic on malformed input.
    let text = match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!("PDF extraction failed: {}", e);
            return Err(ExtractionError::Malformed {
                file_type: FileType::Pdf,
                reason: e.to_string(),
            });
        }
        Err(_) => {
            tracing::error!("PDF extraction panicked, likely malformed fonts or glyphs");
            return Err(ExtractionError::Malformed {
                file_type: FileType::Pdf,
                reason: "the PDF could not be parsed".to_string(),
            });
        }
    };

    join_pages(&text)
}

#[cfg(not(feature = "pdf"))]
pub fn extract_pdf(_bytes: &[u8]) -> Result<String, ExtractionError> {
    tracing::error!("PDF support not compiled in (enable the `pdf` feature)");
    Err(ExtractionError::CapabilityUnavailable(FileType::Pdf))
}

/// pdf-extract separates pages with form feeds. Rejoin them with blank lines.
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn join_pages(raw: &str) -> Result<String, ExtractionError> {
    let pages: Vec<&str> = raw
        .split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect();

    if pages.is_empty() {
        tracing::warn!("PDF text extraction returned empty result");
        return Err(ExtractionError::EmptyContent(FileType::Pdf));
    }

    tracing::debug!("PDF text found on {} pages", pages.len());
    Ok(pages.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_joined_with_blank_line() {
        let raw = "Chapter one\ntext\x0C\n  Chapter two  \x0C\x0CChapter three";
        assert_eq!(
            join_pages(raw).unwrap(),
            "Chapter one\ntext\n\nChapter two\n\nChapter three"
        );
    }

    #[test]
    fn single_page_without_form_feed() {
        assert_eq!(join_pages("\n\nOnly page\n").unwrap(), "Only page");
    }

    #[test]
    fn whitespace_only_is_empty_content() {
        assert!(matches!(
            join_pages(" \n\x0C \t \x0C"),
            Err(ExtractionError::EmptyContent(FileType::Pdf))
        ));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn garbage_bytes_are_malformed() {
        let err = extract_pdf(b"definitely not a pdf").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Malformed { file_type: FileType::Pdf, .. }
        ));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn missing_feature_is_capability_unavailable() {
        assert!(matches!(
            extract_pdf(b"%PDF-1.4"),
            Err(ExtractionError::CapabilityUnavailable(FileType::Pdf))
        ));
    }
}
