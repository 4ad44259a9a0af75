//! ResearchTopic skill: topic × focus-area insight from the static knowledge base.

use crate::payload_str;
use research_core::{AgentSkill, DispatchError, KnowledgeResolver, SessionContext, RESEARCH_SKILL};
use std::sync::Arc;

/// Payload: `{ "topic": string, "focus_area"?: string }`. Malformed fields resolve as unknown
/// (topic) or "general" (focus area); this skill never errors.
pub struct ResearchTopic {
    resolver: Arc<KnowledgeResolver>,
}

impl ResearchTopic {
    pub fn new(resolver: Arc<KnowledgeResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait::async_trait]
impl AgentSkill for ResearchTopic {
    fn name(&self) -> &str {
        RESEARCH_SKILL
    }

    async fn execute(
        &self,
        ctx: &SessionContext,
        payload: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, DispatchError> {
        let topic = payload_str(payload.as_ref(), "topic").unwrap_or("");
        let focus_area = payload_str(payload.as_ref(), "focus_area");
        tracing::info!(
            target: "research::skills",
            session_id = %ctx.session_id,
            topic = %topic,
            focus_area = focus_area.unwrap_or("general"),
            "Tool: research_topic called"
        );

        let research = self.resolver.research(topic, focus_area);
        let mut out = research.to_json();
        out["skill"] = serde_json::json!(RESEARCH_SKILL);
        out["text"] = serde_json::json!(research.text());
        Ok(out)
    }
}
