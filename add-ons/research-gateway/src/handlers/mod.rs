//! Request handlers. Every capability response is wrapped in a [`ResponseEnvelope`] carrying
//! the correlation identifiers.

pub(crate) mod conversation;
pub(crate) mod feedback;
pub(crate) mod research;

use axum::Json;
use research_core::{now_ms, record_quietly, DispatchError, EventSink, SessionContext, TelemetryEvent};
use serde::Serialize;
use std::time::Instant;

/// Response wrapper for research, trend and execute calls.
#[derive(Debug, Serialize)]
pub(crate) struct ResponseEnvelope {
    pub(crate) status: String,
    /// The resolved paragraph or fallback message.
    pub(crate) text: String,
    pub(crate) session_id: String,
    pub(crate) user_id: String,
    /// Per-request trace identifier.
    pub(crate) invocation_id: String,
    pub(crate) timestamp_ms: i64,
    pub(crate) goal: &'static str,
    /// Structured skill output.
    pub(crate) result: serde_json::Value,
}

impl ResponseEnvelope {
    /// Wraps a dispatch outcome. Dispatch errors become `status: "error"` with the error text.
    pub(crate) fn from_dispatch(
        ctx: &SessionContext,
        goal: &'static str,
        outcome: Result<serde_json::Value, DispatchError>,
    ) -> Self {
        let (status, text, result) = match outcome {
            Ok(result) => (
                result
                    .get("status")
                    .and_then(|v| v.as_str())
                    .unwrap_or("success")
                    .to_string(),
                result
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                result,
            ),
            Err(e) => {
                tracing::warn!(
                    target: "research::gateway",
                    invocation_id = %ctx.invocation_id,
                    error = %e,
                    "Dispatch failed"
                );
                (
                    "error".to_string(),
                    e.to_string(),
                    serde_json::json!({ "status": "error", "error": e.to_string() }),
                )
            }
        };
        Self {
            status,
            text,
            session_id: ctx.session_id.clone(),
            user_id: ctx.user_id.clone(),
            invocation_id: ctx.invocation_id.clone(),
            timestamp_ms: now_ms(),
            goal,
            result,
        }
    }
}

/// Records one `request` telemetry event for a handled route.
pub(crate) fn record_request(sink: &dyn EventSink, route: &str, ctx: &SessionContext, status: &str, started: Instant) {
    let event = TelemetryEvent::new("request")
        .with_attr("route", route)
        .with_attr("session_id", ctx.session_id.as_str())
        .with_attr("user_id", ctx.user_id.as_str())
        .with_attr("invocation_id", ctx.invocation_id.as_str())
        .with_attr("status", status)
        .with_latency(started.elapsed());
    record_quietly(sink, &event);
}

/// String field of a JSON body. Missing or non-string values read as absent.
pub(crate) fn str_field<'a>(body: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(|v| v.as_str())
}

/// Body of a lenient route. A missing, mistyped or unparseable body reads as `null`, so every
/// field is absent and the lookup answers with its fallback.
pub(crate) fn lenient_body(body: Option<Json<serde_json::Value>>) -> serde_json::Value {
    match body {
        Some(Json(value)) => value,
        None => {
            tracing::debug!(target: "research::gateway", "Request body missing or not JSON; treating as empty");
            serde_json::Value::Null
        }
    }
}
