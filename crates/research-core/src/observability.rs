//! Telemetry events and the sink they are recorded to.
//!
//! The resolver and gateway record events through [`record_quietly`], so a failing sink can
//! never change a response.

use crate::error::SinkError;
use crate::shared::{now_ms, SERVICE_NAME};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Serialized size above which string attributes get truncated.
pub const MAX_ATTRIBUTES_BYTES: usize = 200 * 1024;
/// Per-attribute size above which a string attribute is truncated.
pub const MAX_ATTRIBUTE_BYTES: usize = 10_000;
/// Characters kept from a truncated attribute (before the marker).
pub const TRUNCATED_ATTRIBUTE_CHARS: usize = 9_900;

const TRUNCATION_MARKER: &str = "... [truncated]";

/// One structured observability event.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent {
    /// Event name, e.g. `research_topic`, `analyze_trends`, `feedback`.
    pub name: String,
    /// Structured attributes (invocation parameters, match outcome, ids).
    pub attributes: Map<String, Value>,
    /// Lookup or handler latency in microseconds, when measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_us: Option<u64>,
    /// Unix timestamp (milliseconds).
    pub timestamp_ms: i64,
}

impl TelemetryEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Map::new(),
            latency_us: None,
            timestamp_ms: now_ms(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_us = Some(latency.as_micros().min(u64::MAX as u128) as u64);
        self
    }
}

/// Observability collaborator with a single "record event" operation.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &TelemetryEvent) -> Result<(), SinkError>;
}

/// Records `event`; a sink failure is reported through `tracing` and otherwise ignored.
pub fn record_quietly(sink: &dyn EventSink, event: &TelemetryEvent) {
    if let Err(e) = sink.record(event) {
        tracing::warn!(
            target: "research::telemetry",
            event = %event.name,
            error = %e,
            "Telemetry sink failed; event dropped"
        );
    }
}

/// Sink that discards everything. Useful in tests and for embedding the resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &TelemetryEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Production sink: emits each event as a structured `tracing` record labelled as agent
/// telemetry. Oversized attribute maps are truncated first.
#[derive(Debug, Clone)]
pub struct TracingEventSink {
    service_name: String,
    debug: bool,
}

impl TracingEventSink {
    pub fn new(service_name: impl Into<String>, debug: bool) -> Self {
        Self {
            service_name: service_name.into(),
            debug,
        }
    }
}

impl Default for TracingEventSink {
    fn default() -> Self {
        Self::new(SERVICE_NAME, false)
    }
}

impl EventSink for TracingEventSink {
    fn record(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
        let attributes = truncate_large_attributes(event.attributes.clone());
        let attributes_json = serde_json::to_string(&attributes)?;
        if self.debug {
            tracing::debug!(target: "research::telemetry", event = ?event, "Telemetry event (debug)");
        }
        tracing::info!(
            target: "research::telemetry",
            kind = "agent_telemetry",
            service_name = %self.service_name,
            event = %event.name,
            latency_us = event.latency_us.unwrap_or(0),
            timestamp_ms = event.timestamp_ms,
            attributes = %attributes_json,
            "{}",
            event.name
        );
        Ok(())
    }
}

/// Keeps telemetry within log-entry size limits. When the serialized attribute map exceeds
/// [`MAX_ATTRIBUTES_BYTES`], every string value over [`MAX_ATTRIBUTE_BYTES`] keeps its first
/// [`TRUNCATED_ATTRIBUTE_CHARS`] characters and is suffixed with `... [truncated]`.
pub fn truncate_large_attributes(attributes: Map<String, Value>) -> Map<String, Value> {
    let size = serde_json::to_vec(&attributes).map(|v| v.len()).unwrap_or(0);
    if size <= MAX_ATTRIBUTES_BYTES {
        return attributes;
    }

    let mut truncated = Map::with_capacity(attributes.len());
    for (key, value) in attributes {
        match value {
            Value::String(s) if s.len() > MAX_ATTRIBUTE_BYTES => {
                let kept = match s.char_indices().nth(TRUNCATED_ATTRIBUTE_CHARS) {
                    Some((cut, _)) => &s[..cut],
                    None => s.as_str(),
                };
                tracing::info!(
                    target: "research::telemetry",
                    attribute = %key,
                    "Truncated large attribute to stay within logging limits"
                );
                truncated.insert(key, Value::String(format!("{}{}", kept, TRUNCATION_MARKER)));
            }
            other => {
                truncated.insert(key, other);
            }
        }
    }
    tracing::info!(
        target: "research::telemetry",
        original_bytes = size,
        "Processed large telemetry attributes by truncating"
    );
    truncated
}
