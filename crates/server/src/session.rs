//! Per-session context, keyed by the `x-session-id` header.
//!
//! Handlers load a snapshot of the context, work on it, and write it back
//! explicitly. The lock is never held across an outbound call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use study_core::QuizData;
use tokio::sync::RwLock;
use tracing::debug;

use crate::state::AppState;

pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-session-id");

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The quiz a session is currently taking.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuiz {
    /// Absent when the quiz could not be persisted.
    pub id: Option<String>,
    pub title: String,
    pub data: QuizData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub last_content: Option<String>,
    pub last_filename: Option<String>,
    pub last_summary: Option<String>,
    pub current_quiz: Option<ActiveQuiz>,
}

impl SessionContext {
    /// Previously seen content, if any non-blank content was kept.
    pub fn content(&self) -> Option<&str> {
        self.last_content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse a known session id, or hand out a fresh one. Fresh ids are not
    /// stored until a handler saves context under them.
    pub async fn resolve(&self, requested: Option<&str>) -> SessionId {
        if let Some(raw) = requested {
            let id = SessionId(raw.to_string());
            if self.sessions.read().await.contains_key(&id) {
                return id;
            }
            debug!("Unknown session id, starting a new session");
        }
        SessionId::generate()
    }

    pub async fn load(&self, id: &SessionId) -> SessionContext {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn save(&self, id: &SessionId, context: SessionContext) {
        self.sessions.write().await.insert(id.clone(), context);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Attach a `SessionId` to every request and echo it in the response header.
pub async fn session_layer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let requested = req
        .headers()
        .get(&SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let id = state.sessions.resolve(requested.as_deref()).await;
    req.extensions_mut().insert(id.clone());

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_or_unknown_id_starts_new_session() {
        let store = SessionStore::new();
        let a = store.resolve(None).await;
        let b = store.resolve(Some("made-up")).await;
        assert_ne!(a, b);
        assert_ne!(b.as_str(), "made-up");
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn saved_id_is_reused() {
        let store = SessionStore::new();
        let id = store.resolve(None).await;
        assert_ne!(store.resolve(Some(id.as_str())).await, id);

        store.save(&id, SessionContext::default()).await;
        assert_eq!(store.resolve(Some(id.as_str())).await, id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.resolve(None).await;
        let b = store.resolve(None).await;

        let mut ctx = store.load(&a).await;
        ctx.last_content = Some("notes".into());
        store.save(&a, ctx).await;

        assert_eq!(store.load(&a).await.content(), Some("notes"));
        assert_eq!(store.load(&b).await.content(), None);
    }

    #[test]
    fn blank_content_is_ignored() {
        let ctx = SessionContext {
            last_content: Some("  \n".into()),
            ..Default::default()
        };
        assert_eq!(ctx.content(), None);
    }
}
