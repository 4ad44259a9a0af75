//! AnalyzeTrends skill: pre-authored trend analysis per domain.

use crate::payload_str;
use research_core::{AgentSkill, DispatchError, KnowledgeResolver, SessionContext, TRENDS_SKILL};
use std::sync::Arc;

/// Payload: `{ "domain": string }`. Never errors; unknown domains get the fallback text.
pub struct AnalyzeTrends {
    resolver: Arc<KnowledgeResolver>,
}

impl AnalyzeTrends {
    pub fn new(resolver: Arc<KnowledgeResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait::async_trait]
impl AgentSkill for AnalyzeTrends {
    fn name(&self) -> &str {
        TRENDS_SKILL
    }

    async fn execute(
        &self,
        ctx: &SessionContext,
        payload: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, DispatchError> {
        let domain = payload_str(payload.as_ref(), "domain").unwrap_or("");
        tracing::info!(
            target: "research::skills",
            session_id = %ctx.session_id,
            domain = %domain,
            "Tool: analyze_trends called"
        );

        let report = self.resolver.analyze_trends(domain);
        let mut out = report.to_json();
        out["skill"] = serde_json::json!(TRENDS_SKILL);
        out["text"] = serde_json::json!(report.text());
        Ok(out)
    }
}
