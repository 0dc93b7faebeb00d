use thiserror::Error;

/// Errors raised while turning user input into model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown difficulty '{0}'. Choose easy, medium or hard")]
    UnknownDifficulty(String),

    #[error("Unsupported file type: {0}")]
    UnknownFileType(String),

    #[error("Question count must be between {min} and {max}, got {got}")]
    QuestionCountOutOfRange { got: String, min: u32, max: u32 },
}
