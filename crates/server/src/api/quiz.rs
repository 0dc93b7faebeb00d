use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use study_core::{
    grade, parse_question_count, ActivityType, Difficulty, Quiz, QuizAttempt, QuizData,
    QuizOutcome, ReferenceType,
};
use study_storage::Stored;
use tracing::{error, info, warn};

use super::upload::read_form;
use super::{not_found, recent, record_activity, ErrorResponse, FlowError};
use crate::session::{ActiveQuiz, SessionId};
use crate::state::AppState;

const USER_INPUT: &str = "User Input";
const ANSWER_PREFIX: &str = "question-";

#[derive(Serialize, Default)]
pub struct QuizView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<QuizOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<String>,
    pub error: Option<String>,
    pub recent: Vec<Stored<Quiz>>,
}

impl QuizView {
    async fn respond(
        state: &AppState,
        result: Result<QuizView, FlowError>,
        action: &str,
    ) -> (StatusCode, Json<QuizView>) {
        let (status, mut view) = match result {
            Ok(view) => (StatusCode::OK, view),
            Err(e) => {
                error!("{}: {}", action, e);
                let view = QuizView {
                    error: Some(e.flash(action)),
                    ..Default::default()
                };
                (e.status(), view)
            }
        };
        view.recent = recent(state).await;
        (status, Json(view))
    }
}

pub async fn quiz_page(State(state): State<Arc<AppState>>) -> Json<QuizView> {
    Json(QuizView {
        recent: recent(&state).await,
        ..Default::default()
    })
}

// ── POST /quiz/generate ──────────────────────────────────────────

pub async fn quiz_generate(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Multipart,
) -> (StatusCode, Json<QuizView>) {
    let result = generate(&state, &session, multipart).await;
    QuizView::respond(&state, result, "Error generating quiz").await
}

async fn generate(
    state: &AppState,
    session: &SessionId,
    multipart: Multipart,
) -> Result<QuizView, FlowError> {
    let form = read_form(multipart).await?;
    let mut ctx = state.sessions.load(session).await;

    // Uploaded file first, then what the session already has, then typed text.
    let (content, filename) = if let Some(file) = form.file.as_ref() {
        ctx.last_content = Some(file.extracted.text.clone());
        ctx.last_filename = Some(file.filename.clone());
        (file.extracted.text.clone(), file.filename.clone())
    } else if let Some(content) = ctx.content() {
        let filename = ctx
            .last_filename
            .clone()
            .unwrap_or_else(|| USER_INPUT.to_string());
        (content.to_string(), filename)
    } else if let Some(text) = form.field("content") {
        ctx.last_content = Some(text.to_string());
        (text.to_string(), USER_INPUT.to_string())
    } else {
        return Err(FlowError::bad_request(
            "Please upload a file or provide text to generate a quiz",
        ));
    };

    let question_count = parse_question_count(form.field("question_count"))?;
    let difficulty = match form.field("difficulty") {
        Some(raw) => raw.parse::<Difficulty>()?,
        None => Difficulty::default(),
    };
    state.sessions.save(session, ctx.clone()).await;

    let quiz_data = state
        .generation
        .generate_quiz(&content, question_count, difficulty)
        .await?;

    let title = format!("Quiz on {filename}");
    let quiz = Quiz {
        title: title.clone(),
        difficulty,
        question_count,
        quiz_data: quiz_data.clone(),
        created_at: None,
    };
    let quiz_id = state.store.save(&quiz).await;
    record_activity(
        state,
        ActivityType::Quiz,
        format!("Generated quiz based on {filename}"),
        quiz_id,
        ReferenceType::Quiz,
    )
    .await;

    let quiz_id = quiz_id.map(|id| id.to_string());
    ctx.current_quiz = Some(ActiveQuiz {
        id: quiz_id.clone(),
        title: title.clone(),
        data: quiz_data.clone(),
    });
    state.sessions.save(session, ctx).await;

    info!(
        "Generated '{}' with {} questions",
        title,
        quiz_data.questions.len()
    );
    Ok(QuizView {
        quiz: Some(quiz_data),
        quiz_id,
        quiz_title: Some(title),
        difficulty: Some(difficulty),
        ..Default::default()
    })
}

// ── POST /quiz/submit ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answers: HashMap<String, String>,
    #[serde(default)]
    pub quiz_id: Option<String>,
}

pub async fn quiz_submit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Json(req): Json<SubmitRequest>,
) -> (StatusCode, Json<QuizView>) {
    let result = submit(&state, &session, req).await;
    QuizView::respond(&state, result, "Error processing your quiz submission").await
}

async fn submit(
    state: &AppState,
    session: &SessionId,
    req: SubmitRequest,
) -> Result<QuizView, FlowError> {
    let ctx = state.sessions.load(session).await;
    let active = match ctx.current_quiz {
        Some(active) => active,
        None => stored_quiz(state, req.quiz_id.as_deref()).await.ok_or_else(|| {
            FlowError::bad_request("Quiz data not found. Please generate a new quiz.")
        })?,
    };

    let answers = normalize_answers(req.answers);
    let outcome = grade(&active.data, &answers);

    let attempt = QuizAttempt {
        quiz_id: active.id.clone().unwrap_or_default(),
        score: outcome.score,
        max_score: outcome.max_score,
        created_at: None,
    };
    let attempt_id = state.store.save(&attempt).await;
    if attempt_id.is_none() {
        warn!("Quiz attempt for '{}' was not stored", active.title);
    }

    info!(
        "Graded '{}': {}/{} ({}%)",
        active.title, outcome.score, outcome.max_score, outcome.percent
    );
    Ok(QuizView {
        quiz_id: active.id,
        quiz_title: Some(active.title),
        outcome: Some(outcome),
        attempt_id: attempt_id.map(|id| id.to_string()),
        ..Default::default()
    })
}

async fn stored_quiz(state: &AppState, quiz_id: Option<&str>) -> Option<ActiveQuiz> {
    let id = quiz_id?;
    let stored = state.store.get::<Quiz>(id).await?;
    Some(ActiveQuiz {
        id: Some(stored.id.to_string()),
        title: stored.record.title,
        data: stored.record.quiz_data,
    })
}

/// Map `question-<n>` keys to the bare index; other keys pass through.
fn normalize_answers(answers: HashMap<String, String>) -> HashMap<String, String> {
    answers
        .into_iter()
        .map(|(key, value)| match key.strip_prefix(ANSWER_PREFIX) {
            Some(idx) => (idx.to_string(), value),
            None => (key, value),
        })
        .collect()
}

// ── GET /quiz/view/{id} ──────────────────────────────────────────

pub async fn quiz_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Quiz>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .store
        .get::<Quiz>(&id)
        .await
        .map(Json)
        .ok_or_else(|| not_found("Quiz not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_keys_lose_their_prefix() {
        let answers = HashMap::from([
            ("question-0".to_string(), "A".to_string()),
            ("question-12".to_string(), "B".to_string()),
            ("3".to_string(), "C".to_string()),
        ]);
        let normalized = normalize_answers(answers);
        assert_eq!(normalized.get("0").map(String::as_str), Some("A"));
        assert_eq!(normalized.get("12").map(String::as_str), Some("B"));
        assert_eq!(normalized.get("3").map(String::as_str), Some("C"));
    }
}
