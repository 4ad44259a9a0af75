//! Trend table: one structured analysis per domain.

use super::normalize_key;
use serde::{Deserialize, Serialize};

/// Closed-set category for trend-analysis queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDomain {
    Technology,
    Business,
    Science,
}

/// Pre-authored trend analysis for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendAnalysis {
    pub key_trends: [&'static str; 5],
    pub emerging_patterns: &'static str,
    pub future_outlook: &'static str,
}

impl TrendAnalysis {
    /// Single-paragraph rendering. Deterministic: same analysis, same text.
    pub fn render(&self) -> String {
        format!(
            "Key trends: {}. Emerging patterns: {} Future outlook: {}",
            self.key_trends.join("; "),
            self.emerging_patterns,
            self.future_outlook
        )
    }
}

const TECHNOLOGY: TrendAnalysis = TrendAnalysis {
    key_trends: [
        "Generative AI and Large Language Models",
        "Edge Computing and IoT Integration",
        "Quantum Computing Development",
        "Sustainable Technology Solutions",
        "Extended Reality (AR/VR/MR)",
    ],
    emerging_patterns: "Technology is moving toward more distributed, intelligent, and sustainable solutions. AI integration is becoming ubiquitous across all tech sectors.",
    future_outlook: "Continued convergence of AI, cloud computing, and sustainable practices will shape the next decade of technological development.",
};

const BUSINESS: TrendAnalysis = TrendAnalysis {
    key_trends: [
        "Digital Transformation Acceleration",
        "Remote and Hybrid Work Models",
        "ESG and Sustainability Focus",
        "Customer Experience Personalization",
        "Data-Driven Decision Making",
    ],
    emerging_patterns: "Businesses are prioritizing agility, sustainability, and customer-centricity while leveraging technology for competitive advantage.",
    future_outlook: "Organizations that successfully balance human-centered approaches with technological innovation will lead market transformations.",
};

const SCIENCE: TrendAnalysis = TrendAnalysis {
    key_trends: [
        "Interdisciplinary Research Collaboration",
        "AI-Assisted Scientific Discovery",
        "Open Science and Data Sharing",
        "Climate Science and Environmental Research",
        "Precision Medicine and Biotechnology",
    ],
    emerging_patterns: "Scientific research is becoming more collaborative, data-intensive, and focused on addressing global challenges.",
    future_outlook: "Integration of AI tools with traditional scientific methods will accelerate discovery and innovation across all fields.",
};

impl TrendDomain {
    pub const ALL: [TrendDomain; 3] = [TrendDomain::Technology, TrendDomain::Business, TrendDomain::Science];

    pub fn label(&self) -> &'static str {
        match self {
            TrendDomain::Technology => "technology",
            TrendDomain::Business => "business",
            TrendDomain::Science => "science",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        Self::ALL.into_iter().find(|d| d.label() == key)
    }

    pub fn analysis(&self) -> &'static TrendAnalysis {
        match self {
            TrendDomain::Technology => &TECHNOLOGY,
            TrendDomain::Business => &BUSINESS,
            TrendDomain::Science => &SCIENCE,
        }
    }
}
