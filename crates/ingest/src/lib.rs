//! Text extraction from uploaded study material.

pub mod document;
pub mod preview;

pub use document::{classify, extract, extract_bytes, ExtractedText, ExtractionError};
pub use preview::{content_preview, DEFAULT_PREVIEW_LENGTH};
