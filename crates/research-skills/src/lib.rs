//! Trait-based agent capability registry and the researcher skills.

pub use research_core::{AgentSkill, SkillRegistry};

mod analyze_trends;
mod research_topic;

pub use analyze_trends::AnalyzeTrends;
pub use research_topic::ResearchTopic;

use research_core::KnowledgeResolver;
use std::sync::Arc;

/// Registry with every researcher skill registered against one shared resolver.
pub fn default_registry(resolver: Arc<KnowledgeResolver>) -> SkillRegistry {
    let mut registry = SkillRegistry::new();
    registry.register(Arc::new(ResearchTopic::new(Arc::clone(&resolver))));
    registry.register(Arc::new(AnalyzeTrends::new(resolver)));
    registry
}

/// String field from a skill payload. Missing or non-string values read as absent.
pub(crate) fn payload_str<'a>(payload: Option<&'a serde_json::Value>, key: &str) -> Option<&'a str> {
    payload.and_then(|p| p.get(key)).and_then(|v| v.as_str())
}
