//! Feedback intake: accepted, logged, acknowledged. Nothing is stored.

use crate::observability::{record_quietly, EventSink, TelemetryEvent};
use crate::shared::SERVICE_NAME;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Feedback for a conversation, correlated by `invocation_id`.
///
/// Only `invocation_id` is required. Rating and comment are kept as sent, whatever their JSON
/// type, and the descriptive fields accept any scalar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feedback {
    /// Rating; usually a number, never range- or type-checked.
    #[serde(default)]
    pub score: Option<Value>,
    /// Comment; usually a string, never checked.
    #[serde(default)]
    pub text: Option<Value>,
    /// Session / conversation identifier this feedback refers to.
    #[serde(deserialize_with = "session_identifier")]
    pub invocation_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub log_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_id: Option<String>,
}

/// Accepts a string or number; anything else is not a usable session identifier.
fn session_identifier<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(<D::Error as serde::de::Error>::custom(format!(
            "invocation_id must be a string or number, got {}",
            other
        ))),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Acknowledgment returned for every accepted feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackReceipt {
    pub status: &'static str,
}

impl Feedback {
    pub fn new(invocation_id: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            ..Self::default()
        }
    }

    pub fn log_type(&self) -> &str {
        self.log_type.as_deref().unwrap_or("feedback")
    }

    pub fn service_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or(SERVICE_NAME)
    }

    /// Logs the record to `sink` and acknowledges it. Sink failures are swallowed.
    pub fn submit(&self, sink: &dyn EventSink) -> FeedbackReceipt {
        let score = self.score.clone().unwrap_or(Value::Null);
        let event = TelemetryEvent::new("feedback")
            .with_attr("log_type", self.log_type())
            .with_attr("service_name", self.service_name())
            .with_attr("invocation_id", self.invocation_id.as_str())
            .with_attr("user_id", self.user_id.as_deref().unwrap_or_default())
            .with_attr("score", score.clone())
            .with_attr("text", self.text.clone().unwrap_or(Value::Null));
        record_quietly(sink, &event);
        tracing::info!(
            target: "research::feedback",
            invocation_id = %self.invocation_id,
            score = %score,
            "Feedback received"
        );
        FeedbackReceipt { status: "success" }
    }
}
