use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::quiz::QuizData;

/// Upload formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Txt,
    Pdf,
    Docx,
}

impl FileType {
    pub const ALL: [FileType; 3] = [FileType::Txt, FileType::Pdf, FileType::Docx];

    /// Classify a file by its name suffix alone (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, ModelError> {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => "",
        };
        ext.parse()
            .map_err(|_| ModelError::UnknownFileType(filename.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Txt => "txt",
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
        }
    }

    /// "txt, pdf, docx" for user-facing messages.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for FileType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(FileType::Txt),
            "pdf" => Ok(FileType::Pdf),
            "docx" => Ok(FileType::Docx),
            other => Err(ModelError::UnknownFileType(other.to_string())),
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ModelError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const MIN_QUESTION_COUNT: u32 = 1;
pub const MAX_QUESTION_COUNT: u32 = 20;

/// Parse a form-supplied question count; blank means the default.
pub fn parse_question_count(raw: Option<&str>) -> Result<u32, ModelError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_QUESTION_COUNT),
        Some(r) => r,
    };
    let out_of_range = || ModelError::QuestionCountOutOfRange {
        got: raw.to_string(),
        min: MIN_QUESTION_COUNT,
        max: MAX_QUESTION_COUNT,
    };
    let count: u32 = raw.parse().map_err(|_| out_of_range())?;
    if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&count) {
        return Err(out_of_range());
    }
    Ok(count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Summarize,
    Quiz,
    Explain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    Summary,
    Quiz,
    Explanation,
}

// ── Persisted documents ──────────────────────────────────────
//
// `created_at` is optional on the Rust side: the store fills it in at write
// time when a caller leaves it empty.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub original_content: String,
    pub summary_content: String,
    pub file_type: FileType,
    pub word_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Summary {
    pub fn new(title: String, file_type: FileType, original_content: String, summary_content: String) -> Self {
        let word_count = word_count(&original_content);
        Self {
            title,
            original_content,
            summary_content,
            file_type,
            word_count,
            created_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    pub difficulty: Difficulty,
    pub question_count: u32,
    pub quiz_data: QuizData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    /// Not enforced: the quiz may be gone or may never have been stored.
    pub quiz_id: String,
    pub score: u32,
    pub max_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub topic: String,
    #[serde(default)]
    pub context: Option<String>,
    pub explanation_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Append-only audit entry written after each successful flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub activity_type: ActivityType,
    pub description: String,
    pub reference_id: String,
    pub reference_type: ReferenceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ActivityLog {
    pub fn new(
        activity_type: ActivityType,
        description: impl Into<String>,
        reference_id: impl Into<String>,
        reference_type: ReferenceType,
    ) -> Self {
        Self {
            activity_type,
            description: description.into(),
            reference_id: reference_id.into(),
            reference_type,
            created_at: Some(Utc::now()),
        }
    }
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
