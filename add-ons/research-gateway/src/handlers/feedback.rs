//! Feedback intake.

use crate::AppState;
use axum::extract::{Json, State};
use research_core::{Feedback, FeedbackReceipt};

/// POST /feedback – logs the feedback record and acknowledges it. Only `invocation_id` is
/// required; rating and comment are accepted whatever their type.
pub(crate) async fn collect_feedback(
    State(state): State<AppState>,
    Json(feedback): Json<Feedback>,
) -> Json<FeedbackReceipt> {
    Json(feedback.submit(state.sink.as_ref()))
}
