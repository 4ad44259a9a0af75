//! Session and conversation routes used by chat clients and the load test.
//!
//! Sessions are acknowledged, not stored: the service keeps no state between requests.

use super::{lenient_body, record_request, str_field};
use crate::AppState;
use axum::extract::{Json, Path, State};
use research_core::{now_ms, Goal, SessionContext};
use std::time::Instant;

/// PUT /apps/:app_name/users/:user_id/sessions/:session_id – echoes the session back.
pub(crate) async fn put_session(
    State(state): State<AppState>,
    Path((app_name, user_id, session_id)): Path<(String, String, String)>,
    body: Option<Json<serde_json::Value>>,
) -> Json<serde_json::Value> {
    let session_state = lenient_body(body)
        .get("state")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));
    tracing::info!(
        target: "research::gateway",
        app_name = %app_name,
        user_id = %user_id,
        session_id = %session_id,
        "Session acknowledged (not persisted)"
    );
    Json(serde_json::json!({
        "id": session_id,
        "app_name": app_name,
        "user_id": user_id,
        "state": session_state,
        "service_name": state.config.app_name,
        "last_update_time": now_ms(),
    }))
}

/// POST /apps/:app_name/users/:user_id/conversations – `{ message, session_id? }`.
/// Routes the message to one lookup and returns its text as `response`.
pub(crate) async fn converse(
    State(state): State<AppState>,
    Path((app_name, user_id)): Path<(String, String)>,
    body: Option<Json<serde_json::Value>>,
) -> Json<serde_json::Value> {
    let started = Instant::now();
    let body = lenient_body(body);
    let ctx = SessionContext::new(Some(user_id.as_str()), str_field(&body, "session_id"));
    let message = str_field(&body, "message").unwrap_or_default().to_string();
    let outcome = state.orchestrator.dispatch(&ctx, Goal::Converse { message }).await;

    let (status, response, routed_goal) = match &outcome {
        Ok(result) => (
            result.get("status").and_then(|v| v.as_str()).unwrap_or("success").to_string(),
            result.get("text").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
            result.get("routed_goal").cloned().unwrap_or(serde_json::Value::Null),
        ),
        Err(e) => {
            tracing::warn!(target: "research::gateway", error = %e, "Conversation dispatch failed");
            ("error".to_string(), e.to_string(), serde_json::Value::Null)
        }
    };
    record_request(state.sink.as_ref(), "/apps/conversations", &ctx, &status, started);

    Json(serde_json::json!({
        "status": status,
        "response": response,
        "conversation_id": ctx.invocation_id,
        "session_id": ctx.session_id,
        "user_id": ctx.user_id,
        "app_name": app_name,
        "routed_goal": routed_goal,
        "timestamp_ms": now_ms(),
    }))
}
