//! Summaries, plus key-point extraction and categorization of study material.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use study_core::{ActivityType, ReferenceType, Summary};
use study_ingest::{content_preview, DEFAULT_PREVIEW_LENGTH};
use study_llm::{Categories, DEFAULT_MAX_KEY_POINTS};
use study_storage::{ListQuery, Stored};
use tracing::{error, info};

use super::upload::{read_form, FlowForm};
use super::{not_found, recent, record_activity, ErrorResponse, FlowError};
use crate::session::{SessionContext, SessionId};
use crate::state::AppState;

// ── Views ────────────────────────────────────────────────────────

#[derive(Serialize, Default)]
pub struct SummarizeView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub error: Option<String>,
    pub recent: Vec<Stored<Summary>>,
}

#[derive(Serialize)]
pub struct HistoryView {
    pub summaries: Vec<Stored<Summary>>,
}

#[derive(Serialize, Default)]
pub struct KeyPointsView {
    pub key_points: Vec<String>,
    pub error: Option<String>,
}

#[derive(Serialize, Default)]
pub struct CategoriesView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Categories>,
    pub error: Option<String>,
}

// ── GET /summarize ───────────────────────────────────────────────

pub async fn summarize_page(State(state): State<Arc<AppState>>) -> Json<SummarizeView> {
    Json(SummarizeView {
        recent: recent(&state).await,
        ..Default::default()
    })
}

// ── POST /summarize/process ──────────────────────────────────────

pub async fn summarize_process(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Multipart,
) -> (StatusCode, Json<SummarizeView>) {
    let (status, mut view) = match process(&state, &session, multipart).await {
        Ok(view) => (StatusCode::OK, view),
        Err(e) => {
            error!("Error processing file: {}", e);
            let view = SummarizeView {
                error: Some(e.flash("Error processing file")),
                ..Default::default()
            };
            (e.status(), view)
        }
    };
    view.recent = recent(&state).await;
    (status, Json(view))
}

async fn process(
    state: &AppState,
    session: &SessionId,
    multipart: Multipart,
) -> Result<SummarizeView, FlowError> {
    let form = read_form(multipart).await?;
    let Some(file) = form.file else {
        let msg = if form.file_part_present {
            "No selected file"
        } else {
            "No file part"
        };
        return Err(FlowError::bad_request(msg));
    };

    let content = file.extracted.text;
    let summary = state.generation.summarize(&content).await?;

    let mut ctx = state.sessions.load(session).await;
    ctx.last_content = Some(content.clone());
    ctx.last_filename = Some(file.filename.clone());
    ctx.last_summary = Some(summary.clone());
    state.sessions.save(session, ctx).await;

    let preview = content_preview(&content, DEFAULT_PREVIEW_LENGTH);
    let record = Summary::new(
        file.filename.clone(),
        file.extracted.file_type,
        content,
        summary.clone(),
    );
    let summary_id = state.store.save(&record).await;
    record_activity(
        state,
        ActivityType::Summarize,
        format!("Generated summary for {}", file.filename),
        summary_id,
        ReferenceType::Summary,
    )
    .await;

    info!(
        "Summarized '{}' ({} words, stored: {})",
        file.filename,
        record.word_count,
        summary_id.is_some()
    );
    Ok(SummarizeView {
        summary: Some(summary),
        filename: Some(file.filename),
        summary_id: summary_id.map(|id| id.to_string()),
        preview: Some(preview),
        ..Default::default()
    })
}

// ── GET /summarize/history, /summarize/view/{id} ─────────────────

pub async fn summarize_history(State(state): State<Arc<AppState>>) -> Json<HistoryView> {
    Json(HistoryView {
        summaries: state.store.list(&ListQuery::default()).await,
    })
}

pub async fn summarize_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Summary>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .store
        .get::<Summary>(&id)
        .await
        .map(Json)
        .ok_or_else(|| not_found("Summary not found"))
}

// ── POST /summarize/key-points, /summarize/categorize ────────────

/// Text to analyse: an uploaded file, else `content`, else the session's
/// last content.
fn material(form: &FlowForm, ctx: &SessionContext) -> Result<String, FlowError> {
    if let Some(file) = &form.file {
        return Ok(file.extracted.text.clone());
    }
    form.field("content")
        .or_else(|| ctx.content())
        .map(str::to_string)
        .ok_or_else(|| FlowError::bad_request("Please upload a file or provide text to analyze"))
}

pub async fn summarize_key_points(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Multipart,
) -> (StatusCode, Json<KeyPointsView>) {
    match key_points(&state, &session, multipart).await {
        Ok(points) => (
            StatusCode::OK,
            Json(KeyPointsView {
                key_points: points,
                error: None,
            }),
        ),
        Err(e) => {
            error!("Error extracting key points: {}", e);
            (
                e.status(),
                Json(KeyPointsView {
                    error: Some(e.flash("Error extracting key points")),
                    ..Default::default()
                }),
            )
        }
    }
}

async fn key_points(
    state: &AppState,
    session: &SessionId,
    multipart: Multipart,
) -> Result<Vec<String>, FlowError> {
    let form = read_form(multipart).await?;
    let ctx = state.sessions.load(session).await;
    let text = material(&form, &ctx)?;
    let max_points = match form.field("max_points") {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| FlowError::bad_request(format!("Invalid max_points '{raw}'")))?,
        None => DEFAULT_MAX_KEY_POINTS,
    };
    Ok(state.generation.extract_key_points(&text, max_points).await?)
}

pub async fn summarize_categorize(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Multipart,
) -> (StatusCode, Json<CategoriesView>) {
    let result = async {
        let form = read_form(multipart).await?;
        let ctx = state.sessions.load(&session).await;
        let text = material(&form, &ctx)?;
        Ok::<_, FlowError>(state.generation.categorize(&text).await?)
    }
    .await;

    match result {
        Ok(categories) => (
            StatusCode::OK,
            Json(CategoriesView {
                categories: Some(categories),
                error: None,
            }),
        ),
        Err(e) => {
            error!("Error categorizing content: {}", e);
            (
                e.status(),
                Json(CategoriesView {
                    error: Some(e.flash("Error categorizing content")),
                    ..Default::default()
                }),
            )
        }
    }
}
