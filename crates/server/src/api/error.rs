use axum::http::StatusCode;
use study_core::{FileType, ModelError};
use study_ingest::ExtractionError;
use study_llm::LlmError;
use thiserror::Error;

/// Anything that stops a flow from producing its result.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Generation(#[from] LlmError),
    #[error(transparent)]
    Input(#[from] ModelError),
    #[error("{0}")]
    BadRequest(String),
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl FlowError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        FlowError::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            FlowError::Extraction(_) | FlowError::Input(_) | FlowError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            FlowError::Generation(LlmError::NotConfigured(_)) => StatusCode::SERVICE_UNAVAILABLE,
            FlowError::Generation(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            FlowError::Generation(_) => StatusCode::BAD_GATEWAY,
            FlowError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The flash message. `action` prefixes failures that happen mid-flow,
    /// e.g. "Error generating quiz".
    pub fn flash(&self, action: &str) -> String {
        match self {
            FlowError::Extraction(ExtractionError::UnsupportedType(_)) => unsupported_type_message(),
            FlowError::Extraction(e) => format!("Error processing file: {e}"),
            FlowError::Generation(e) => format!("{action}: {}", e.user_message()),
            FlowError::Input(e) => e.to_string(),
            FlowError::BadRequest(msg) => msg.clone(),
            FlowError::Task(_) => format!("{action}: the file could not be processed"),
        }
    }
}

pub fn unsupported_type_message() -> String {
    format!(
        "File type not supported. Please upload {} files",
        FileType::allowed_list()
    )
}

#[cfg(test)]
mod tests {
    use study_core::config::GenerationConfig;
    use study_llm::{GeminiProvider, LlmProvider, ValidationError};

    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (FlowError::from(ExtractionError::UnsupportedType("a.csv".into())), 400),
            (FlowError::from(ExtractionError::EmptyContent(FileType::Pdf)), 400),
            (FlowError::bad_request("no topic"), 400),
            (FlowError::from(LlmError::NotConfigured("key".into())), 503),
            (FlowError::from(LlmError::ApiError { status: 500, body: "x".into() }), 502),
            (FlowError::from(LlmError::EmptyResult), 502),
            (FlowError::from(LlmError::Validation(ValidationError::MissingQuestions)), 502),
        ];
        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn unsupported_type_flash() {
        let err = FlowError::from(ExtractionError::UnsupportedType("grades.csv".into()));
        assert_eq!(
            err.flash("Error processing file"),
            "File type not supported. Please upload txt, pdf, docx files"
        );
    }

    #[test]
    fn generation_flash_shows_status_and_body() {
        let err = FlowError::from(LlmError::ApiError {
            status: 500,
            body: "model overloaded".into(),
        });
        assert_eq!(
            err.flash("Error generating quiz"),
            "Error generating quiz: The AI service returned an error (status 500): model overloaded"
        );
    }

    #[tokio::test]
    async fn upstream_timeout_is_gateway_timeout() {
        // Accepted by the kernel backlog, never answered.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let provider = GeminiProvider::new(&GenerationConfig {
            api_key: Some("k".into()),
            model: "gemini-1.5-flash".into(),
            base_url: format!("http://{addr}/v1beta"),
            timeout_secs: 1,
        })
        .unwrap();
        let err = provider.generate("hi").await.unwrap_err();
        assert!(err.is_timeout(), "{err:?}");

        let err = FlowError::from(err);
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(err.flash("Error generating explanation").contains("too long"));
        drop(listener);
    }

    #[tokio::test]
    async fn failed_extraction_task_is_internal_error() {
        let join_err = tokio::spawn(async { panic!("extractor blew up") })
            .await
            .unwrap_err();
        let err = FlowError::from(join_err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.flash("Error processing file"),
            "Error processing file: the file could not be processed"
        );
    }
}
