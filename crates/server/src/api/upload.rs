use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use study_ingest::ExtractedText;
use tracing::debug;

use super::error::FlowError;

const FILE_FIELD: &str = "file";

pub struct UploadedFile {
    pub filename: String,
    pub extracted: ExtractedText,
}

/// A parsed flow form: at most one extracted file plus the text fields.
#[derive(Default)]
pub struct FlowForm {
    pub file: Option<UploadedFile>,
    /// A `file` part was sent, even if no file was chosen.
    pub file_part_present: bool,
    fields: HashMap<String, String>,
}

impl FlowForm {
    /// A text field, trimmed; blank counts as missing.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Read a multipart form. The upload's type is checked from its filename
/// before the body of that part is read.
pub async fn read_form(mut multipart: Multipart) -> Result<FlowForm, FlowError> {
    let mut form = FlowForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name != FILE_FIELD {
            let value = field.text().await.map_err(multipart_error)?;
            form.fields.insert(name, value);
            continue;
        }

        form.file_part_present = true;
        let filename = field.file_name().map(base_name).unwrap_or_default();
        if filename.is_empty() {
            debug!("Empty file part, no file selected");
            continue;
        }

        let file_type = study_ingest::classify(&filename)?;
        let bytes = field.bytes().await.map_err(multipart_error)?;
        // pdf/docx parsing is CPU-bound; keep it off the async workers.
        let extracted = tokio::task::spawn_blocking(move || {
            study_ingest::extract_bytes(&bytes, file_type)
        })
        .await??;
        debug!(
            "Extracted {} words from '{}'",
            extracted.word_count(),
            filename
        );
        form.file = Some(UploadedFile { filename, extracted });
    }

    Ok(form)
}

/// Last path component of a client-supplied filename.
pub fn base_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn multipart_error(e: MultipartError) -> FlowError {
    FlowError::bad_request(format!("Multipart error: {}", e.body_text()))
}
