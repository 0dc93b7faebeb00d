use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use study_core::{ActivityLog, Explanation, Quiz, QuizAttempt, Summary};
use uuid::Uuid;

/// Named groups of stored documents, one table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Summaries,
    Quizzes,
    QuizAttempts,
    Explanations,
    UserActivities,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Summaries,
        Collection::Quizzes,
        Collection::QuizAttempts,
        Collection::Explanations,
        Collection::UserActivities,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Summaries => "summaries",
            Collection::Quizzes => "quizzes",
            Collection::QuizAttempts => "quiz_attempts",
            Collection::Explanations => "explanations",
            Collection::UserActivities => "user_activities",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A document type with a home collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
}

impl Record for Summary {
    const COLLECTION: Collection = Collection::Summaries;
}

impl Record for Quiz {
    const COLLECTION: Collection = Collection::Quizzes;
}

impl Record for QuizAttempt {
    const COLLECTION: Collection = Collection::QuizAttempts;
}

impl Record for Explanation {
    const COLLECTION: Collection = Collection::Explanations;
}

impl Record for ActivityLog {
    const COLLECTION: Collection = Collection::UserActivities;
}

/// Store-assigned identifier, rendered as a hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// `None` for anything that is not a UUID.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A record together with its id. Serializes flat: `{"id": ..., <fields>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: T,
}
