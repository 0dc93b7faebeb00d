use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use study_core::{ActivityType, Explanation, ReferenceType};
use study_storage::Stored;
use tracing::{error, info};

use super::upload::read_form;
use super::{not_found, recent, record_activity, ErrorResponse, FlowError};
use crate::session::SessionId;
use crate::state::AppState;

#[derive(Serialize, Default)]
pub struct ExplainView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_id: Option<String>,
    pub error: Option<String>,
    pub recent: Vec<Stored<Explanation>>,
}

pub async fn explain_page(State(state): State<Arc<AppState>>) -> Json<ExplainView> {
    Json(ExplainView {
        recent: recent(&state).await,
        ..Default::default()
    })
}

pub async fn explain_process(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Multipart,
) -> (StatusCode, Json<ExplainView>) {
    let (status, mut view) = match process(&state, &session, multipart).await {
        Ok(view) => (StatusCode::OK, view),
        Err(e) => {
            error!("Error generating explanation: {}", e);
            let view = ExplainView {
                error: Some(e.flash("Error generating explanation")),
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
) -> Result<ExplainView, FlowError> {
    let form = read_form(multipart).await?;
    let mut ctx = state.sessions.load(session).await;

    // Context is optional: uploaded file, then session content, then typed text.
    let context = if let Some(file) = form.file.as_ref() {
        ctx.last_content = Some(file.extracted.text.clone());
        Some(file.extracted.text.clone())
    } else if let Some(content) = ctx.content() {
        Some(content.to_string())
    } else if let Some(text) = form.field("context") {
        ctx.last_content = Some(text.to_string());
        Some(text.to_string())
    } else {
        None
    };
    state.sessions.save(session, ctx).await;

    let topic = form
        .field("topic")
        .ok_or_else(|| FlowError::bad_request("Please provide a topic or concept to explain"))?
        .to_string();

    let explanation = state.generation.explain(&topic, context.as_deref()).await?;

    let record = Explanation {
        topic: topic.clone(),
        context,
        explanation_content: explanation.clone(),
        created_at: None,
    };
    let explanation_id = state.store.save(&record).await;
    record_activity(
        state,
        ActivityType::Explain,
        format!("Generated explanation for topic: {topic}"),
        explanation_id,
        ReferenceType::Explanation,
    )
    .await;

    info!("Explained '{}' (stored: {})", topic, explanation_id.is_some());
    Ok(ExplainView {
        topic: Some(topic),
        explanation: Some(explanation),
        explanation_id: explanation_id.map(|id| id.to_string()),
        ..Default::default()
    })
}

pub async fn explain_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Explanation>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .store
        .get::<Explanation>(&id)
        .await
        .map(Json)
        .ok_or_else(|| not_found("Explanation not found"))
}
