//! research-core: researcher agent core library (shared types, config, static knowledge base,
//! resolver, observability, orchestrator).
//!
//! The gateway and skills depend only on the re-exports below.

mod error;
mod feedback;
mod knowledge;
mod observability;
mod orchestrator;
mod shared;

// Shared
pub use shared::{now_ms, CoreConfig, Goal, SessionContext, DEFAULT_SESSION_ID, DEFAULT_USER_ID, SERVICE_NAME};

// Errors
pub use error::{DispatchError, SinkError};

// Knowledge base and resolver
pub use knowledge::{
    FocusArea, KnowledgeResolver, Research, ResearchStatus, Topic, TrendAnalysis, TrendDomain, TrendReport,
    ANALYSIS_DATE, LAST_UPDATED, METHODOLOGY,
};

// Observability
pub use observability::{
    record_quietly, truncate_large_attributes, EventSink, NoopEventSink, TelemetryEvent, TracingEventSink,
    MAX_ATTRIBUTES_BYTES, MAX_ATTRIBUTE_BYTES, TRUNCATED_ATTRIBUTE_CHARS,
};

// Feedback intake
pub use feedback::{Feedback, FeedbackReceipt};

// Orchestrator
pub use orchestrator::{
    route_message, AgentSkill, Orchestrator, RoutedGoal, SkillRegistry, RESEARCH_SKILL, TRENDS_SKILL,
};
