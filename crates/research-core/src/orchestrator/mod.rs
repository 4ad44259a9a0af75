//! Request dispatch: goals are routed to registered skills by name.

mod intent;

pub use intent::{route_message, RoutedGoal};

use crate::error::DispatchError;
use crate::shared::{Goal, SessionContext};
use std::sync::Arc;

/// Skill name serving [`Goal::ResearchTopic`].
pub const RESEARCH_SKILL: &str = "ResearchTopic";
/// Skill name serving [`Goal::AnalyzeTrends`].
pub const TRENDS_SKILL: &str = "AnalyzeTrends";

/// Trait implemented by all agent capabilities (skills).
#[async_trait::async_trait]
pub trait AgentSkill: Send + Sync {
    /// Unique skill name for routing.
    fn name(&self) -> &str;

    /// Executes the skill with the given context and optional payload.
    async fn execute(
        &self,
        ctx: &SessionContext,
        payload: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, DispatchError>;
}

/// Registry of agent skills that can be dispatched by name.
pub struct SkillRegistry {
    skills: Vec<Arc<dyn AgentSkill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self { skills: Vec::new() }
    }

    pub fn register(&mut self, skill: Arc<dyn AgentSkill>) {
        self.skills.push(skill);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentSkill>> {
        self.skills.iter().find(|s| s.name() == name).cloned()
    }

    /// Returns the names of all registered skills (for discovery and status).
    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name().to_string()).collect()
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatches goals to skills. Holds no per-request state; share it behind an `Arc`.
pub struct Orchestrator {
    registry: Arc<SkillRegistry>,
}

impl Orchestrator {
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        Self { registry }
    }

    pub fn skill_names(&self) -> Vec<String> {
        self.registry.skill_names()
    }

    fn skill(&self, name: &str) -> Result<Arc<dyn AgentSkill>, DispatchError> {
        self.registry
            .get(name)
            .ok_or_else(|| DispatchError::UnknownSkill(name.to_string()))
    }

    /// Dispatches a goal. `Converse` is routed by keyword first; the result then carries the
    /// routed goal under `"routed_goal"`.
    pub async fn dispatch(
        &self,
        ctx: &SessionContext,
        goal: Goal,
    ) -> Result<serde_json::Value, DispatchError> {
        tracing::debug!(
            target: "research::orchestrator",
            goal = goal.label(),
            invocation_id = %ctx.invocation_id,
            "Dispatching goal"
        );
        match goal {
            Goal::ResearchTopic { topic, focus_area } => {
                let payload = serde_json::json!({ "topic": topic, "focus_area": focus_area });
                self.skill(RESEARCH_SKILL)?.execute(ctx, Some(payload)).await
            }
            Goal::AnalyzeTrends { domain } => {
                let payload = serde_json::json!({ "domain": domain });
                self.skill(TRENDS_SKILL)?.execute(ctx, Some(payload)).await
            }
            Goal::Converse { message } => {
                let routed = route_message(&message);
                let routed_label = routed.label();
                let (skill, payload) = match routed {
                    RoutedGoal::Research { topic, focus_area } => (
                        RESEARCH_SKILL,
                        serde_json::json!({ "topic": topic, "focus_area": focus_area }),
                    ),
                    RoutedGoal::Trends { domain } => (TRENDS_SKILL, serde_json::json!({ "domain": domain })),
                };
                let result = self.skill(skill)?.execute(ctx, Some(payload)).await?;
                let mut map = match result {
                    serde_json::Value::Object(m) => m,
                    other => {
                        let mut m = serde_json::Map::new();
                        m.insert("result".to_string(), other);
                        m
                    }
                };
                map.insert("routed_goal".to_string(), serde_json::json!(routed_label));
                map.insert("message".to_string(), serde_json::json!(message));
                Ok(serde_json::Value::Object(map))
            }
            Goal::ExecuteSkill { name, payload } => self.skill(&name)?.execute(ctx, payload).await,
        }
    }
}
