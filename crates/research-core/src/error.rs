//! Error types for dispatch and telemetry.
//!
//! Neither is ever raised for an unrecognized topic, focus area or domain; those resolve to
//! fallback text.

use thiserror::Error;

/// Errors returned by [`crate::Orchestrator::dispatch`] and skills.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown skill: {0}")]
    UnknownSkill(String),
}

/// Errors an [`crate::EventSink`] may report. Callers swallow these.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("telemetry sink unavailable: {0}")]
    Unavailable(String),

    #[error("telemetry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
