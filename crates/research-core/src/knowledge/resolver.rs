//! Knowledge resolver: normalized lookups with deterministic fallback text.

use super::{join_labels, normalize_key, FocusArea, Topic, TrendAnalysis, TrendDomain};
use crate::observability::{record_quietly, EventSink, NoopEventSink, TelemetryEvent};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

pub const METHODOLOGY: &str = "Analysis based on existing knowledge base";
pub const LAST_UPDATED: &str = "Knowledge current as of training data";
pub const ANALYSIS_DATE: &str = "Based on current knowledge patterns";

/// Whether a lookup hit the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStatus {
    Success,
    Error,
}

impl ResearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchStatus::Success => "success",
            ResearchStatus::Error => "error",
        }
    }
}

/// Outcome of [`KnowledgeResolver::research`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Research {
    /// Topic as the caller sent it.
    pub topic: String,
    /// Focus area as the caller sent it ("general" when omitted).
    pub focus_area: String,
    /// Resolved table keys; `None` when the topic is unknown.
    pub resolved: Option<(Topic, FocusArea)>,
    /// True when a known topic was asked with an unknown focus area and "general" was served.
    pub focus_fallback: bool,
    text: String,
}

impl Research {
    pub fn status(&self) -> ResearchStatus {
        if self.resolved.is_some() {
            ResearchStatus::Success
        } else {
            ResearchStatus::Error
        }
    }

    /// The insight paragraph, or the "topic not available" message.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Structured view: `{status, research: {...}}` or `{status, error_message}`.
    pub fn to_json(&self) -> serde_json::Value {
        match self.resolved {
            Some(_) => serde_json::json!({
                "status": self.status().as_str(),
                "research": {
                    "topic": self.topic,
                    "focus_area": self.focus_area,
                    "insights": self.text,
                    "methodology": METHODOLOGY,
                    "last_updated": LAST_UPDATED,
                }
            }),
            None => serde_json::json!({
                "status": self.status().as_str(),
                "error_message": self.text,
            }),
        }
    }
}

/// Outcome of [`KnowledgeResolver::analyze_trends`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendReport {
    /// Domain as the caller sent it.
    pub domain: String,
    pub resolved: Option<TrendDomain>,
    text: String,
}

impl TrendReport {
    pub fn status(&self) -> ResearchStatus {
        if self.resolved.is_some() {
            ResearchStatus::Success
        } else {
            ResearchStatus::Error
        }
    }

    /// The rendered analysis, or the "domain not available" message.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn analysis(&self) -> Option<&'static TrendAnalysis> {
        self.resolved.map(|d| d.analysis())
    }

    /// Structured view: `{status, analysis, domain, analysis_date}` or `{status, error_message}`.
    pub fn to_json(&self) -> serde_json::Value {
        match self.analysis() {
            Some(analysis) => serde_json::json!({
                "status": self.status().as_str(),
                "analysis": analysis,
                "domain": self.domain,
                "analysis_date": ANALYSIS_DATE,
                "summary": self.text,
            }),
            None => serde_json::json!({
                "status": self.status().as_str(),
                "error_message": self.text,
            }),
        }
    }
}

/// Pure lookup component over the static tables. Holds nothing but the telemetry sink, so a
/// single instance is shared by every request.
#[derive(Clone)]
pub struct KnowledgeResolver {
    sink: Arc<dyn EventSink>,
}

impl Default for KnowledgeResolver {
    fn default() -> Self {
        Self::new(Arc::new(NoopEventSink))
    }
}

impl KnowledgeResolver {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Supported topics, comma separated, in listing order.
    pub fn supported_topics() -> String {
        join_labels(Topic::ALL.iter().map(|t| t.label()))
    }

    /// Supported trend domains, comma separated, in listing order.
    pub fn supported_domains() -> String {
        join_labels(TrendDomain::ALL.iter().map(|d| d.label()))
    }

    /// Looks up the insight for `topic` from `focus_area` (default "general").
    ///
    /// Known topic and focus: that paragraph. Known topic, unknown focus: the topic's "general"
    /// paragraph. Unknown topic: a message listing the supported topics. Never fails.
    pub fn research(&self, topic: &str, focus_area: Option<&str>) -> Research {
        let started = Instant::now();
        let focus_raw = focus_area.unwrap_or(FocusArea::General.label());

        let research = match Topic::parse(topic) {
            Some(t) => {
                let (focus, focus_fallback) = match FocusArea::parse(focus_raw) {
                    Some(f) => (f, false),
                    None => (FocusArea::General, true),
                };
                Research {
                    topic: topic.to_string(),
                    focus_area: focus_raw.to_string(),
                    resolved: Some((t, focus)),
                    focus_fallback,
                    text: t.insight(focus).to_string(),
                }
            }
            None => Research {
                topic: topic.to_string(),
                focus_area: focus_raw.to_string(),
                resolved: None,
                focus_fallback: false,
                text: format!(
                    "Sorry, I don't have comprehensive research data for '{}'. Available topics include: {}.",
                    topic,
                    Self::supported_topics()
                ),
            },
        };

        let event = TelemetryEvent::new("research_topic")
            .with_attr("topic", topic)
            .with_attr("focus_area", focus_raw)
            .with_attr("topic_key", normalize_key(topic))
            .with_attr("matched", research.resolved.is_some())
            .with_attr("focus_fallback", research.focus_fallback)
            .with_latency(started.elapsed());
        record_quietly(self.sink.as_ref(), &event);

        research
    }

    /// Looks up the trend analysis for `domain`. Unknown domain: a message listing the supported
    /// domains. Never fails.
    pub fn analyze_trends(&self, domain: &str) -> TrendReport {
        let started = Instant::now();

        let report = match TrendDomain::parse(domain) {
            Some(d) => TrendReport {
                domain: domain.to_string(),
                resolved: Some(d),
                text: d.analysis().render(),
            },
            None => TrendReport {
                domain: domain.to_string(),
                resolved: None,
                text: format!(
                    "Sorry, trend analysis not available for '{}'. Available domains: {}.",
                    domain,
                    Self::supported_domains()
                ),
            },
        };

        let event = TelemetryEvent::new("analyze_trends")
            .with_attr("domain", domain)
            .with_attr("domain_key", normalize_key(domain))
            .with_attr("matched", report.resolved.is_some())
            .with_latency(started.elapsed());
        record_quietly(self.sink.as_ref(), &event);

        report
    }
}
