//! Domain-focused API endpoint modules.
//!
//! Every flow answers with a JSON view: the result when there is one, an
//! optional `error` flash message, and the most recent records of its kind.
//! Shared helpers live here in mod.rs.

mod error;
mod explain;
mod health;
mod quiz;
mod summarize;
mod upload;


use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use study_core::{ActivityLog, ActivityType, ReferenceType};
use study_storage::{ListQuery, Record, RecordId, Stored};
use tracing::debug;

use crate::state::AppState;

pub use error::FlowError;

/// How many records each page shows alongside its result.
const RECENT_LIMIT: u32 = 5;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn not_found(msg: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
}

// ── Store helpers ────────────────────────────────────────────────

pub(crate) async fn recent<T: Record>(state: &AppState) -> Vec<Stored<T>> {
    state.store.list(&ListQuery::recent(RECENT_LIMIT)).await
}

/// Log an activity for a record that was actually stored.
pub(crate) async fn record_activity(
    state: &AppState,
    activity_type: ActivityType,
    description: String,
    reference: Option<RecordId>,
    reference_type: ReferenceType,
) {
    let Some(reference_id) = reference else {
        debug!("Skipping activity log, record has no id");
        return;
    };
    let entry = ActivityLog::new(
        activity_type,
        description,
        reference_id.to_string(),
        reference_type,
    );
    state.store.log_activity(&entry).await;
}

// ── Re-exports ───────────────────────────────────────────────────
// Flat `api::foo` paths used by router.rs route registration.

pub use explain::{explain_page, explain_process, explain_view};
pub use health::health;
pub use quiz::{quiz_generate, quiz_page, quiz_submit, quiz_view};
pub use summarize::{
    summarize_categorize, summarize_history, summarize_key_points, summarize_page,
    summarize_process, summarize_view,
};
