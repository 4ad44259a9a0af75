//! Direct capability endpoints: research and trend analysis.
//!
//! Bodies are read leniently: a missing or unparseable body, and missing or mistyped fields,
//! resolve as unknown keys (or "general" for the focus area) instead of being rejected.

use super::{lenient_body, record_request, str_field, ResponseEnvelope};
use crate::AppState;
use axum::extract::{Json, State};
use research_core::{Goal, SessionContext};
use std::time::Instant;

/// POST /api/v1/research – `{ topic, focus_area?, session_id?, user_id? }`.
pub(crate) async fn research(
    State(state): State<AppState>,
    body: Option<Json<serde_json::Value>>,
) -> Json<ResponseEnvelope> {
    let started = Instant::now();
    let body = lenient_body(body);
    let ctx = SessionContext::new(str_field(&body, "user_id"), str_field(&body, "session_id"));
    let goal = Goal::ResearchTopic {
        topic: str_field(&body, "topic").unwrap_or_default().to_string(),
        focus_area: str_field(&body, "focus_area").map(str::to_string),
    };
    let label = goal.label();
    let outcome = state.orchestrator.dispatch(&ctx, goal).await;
    let envelope = ResponseEnvelope::from_dispatch(&ctx, label, outcome);
    record_request(state.sink.as_ref(), "/api/v1/research", &ctx, &envelope.status, started);
    Json(envelope)
}

/// POST /api/v1/trends – `{ domain, session_id?, user_id? }`.
pub(crate) async fn trends(
    State(state): State<AppState>,
    body: Option<Json<serde_json::Value>>,
) -> Json<ResponseEnvelope> {
    let started = Instant::now();
    let body = lenient_body(body);
    let ctx = SessionContext::new(str_field(&body, "user_id"), str_field(&body, "session_id"));
    let goal = Goal::AnalyzeTrends {
        domain: str_field(&body, "domain").unwrap_or_default().to_string(),
    };
    let label = goal.label();
    let outcome = state.orchestrator.dispatch(&ctx, goal).await;
    let envelope = ResponseEnvelope::from_dispatch(&ctx, label, outcome);
    record_request(state.sink.as_ref(), "/api/v1/trends", &ctx, &envelope.status, started);
    Json(envelope)
}
