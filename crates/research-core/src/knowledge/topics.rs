//! Topic table: three topics, four focus areas each.

use super::normalize_key;
use serde::{Deserialize, Serialize};

/// A subject in the closed research set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    ArtificialIntelligence,
    ClimateChange,
    Blockchain,
}

impl Topic {
    /// All topics, in the order they are listed to callers.
    pub const ALL: [Topic; 3] = [Topic::ArtificialIntelligence, Topic::ClimateChange, Topic::Blockchain];

    /// Canonical lowercase name; also the lookup key.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::ArtificialIntelligence => "artificial intelligence",
            Topic::ClimateChange => "climate change",
            Topic::Blockchain => "blockchain",
        }
    }

    /// Case-insensitive match against the closed set. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        Self::ALL.into_iter().find(|t| t.label() == key)
    }

    /// Insight paragraph for this topic from the given perspective.
    pub fn insight(&self, focus: FocusArea) -> &'static str {
        use FocusArea::*;
        match (self, focus) {
            (Topic::ArtificialIntelligence, General) => "AI is a rapidly evolving field focused on creating machines that can perform tasks typically requiring human intelligence. Key areas include machine learning, natural language processing, computer vision, and robotics. Current trends show significant advancement in large language models, generative AI, and autonomous systems.",
            (Topic::ArtificialIntelligence, Technical) => "AI encompasses various approaches including supervised/unsupervised learning, neural networks, deep learning architectures (CNNs, RNNs, Transformers), reinforcement learning, and symbolic AI. Modern architectures like attention mechanisms and transformer models have revolutionized NLP and multimodal applications.",
            (Topic::ArtificialIntelligence, Business) => "AI is transforming industries through automation, predictive analytics, personalized experiences, and decision support systems. Companies are investing heavily in AI infrastructure, talent acquisition, and ethical AI practices. Key challenges include ROI measurement, data quality, and integration complexity.",
            (Topic::ArtificialIntelligence, Social) => "AI raises important questions about job displacement, privacy, bias in algorithms, and the future of human-machine collaboration. Discussions focus on AI governance, ethical frameworks, transparency, and ensuring AI benefits society broadly.",

            (Topic::ClimateChange, General) => "Climate change refers to long-term shifts in global temperatures and weather patterns, primarily driven by human activities since the Industrial Revolution. Key indicators include rising global temperatures, melting ice caps, sea level rise, and extreme weather events.",
            (Topic::ClimateChange, Technical) => "Climate science involves understanding greenhouse gas emissions (CO2, CH4, N2O), feedback loops, climate modeling, and mitigation technologies. Solutions include renewable energy systems, carbon capture, energy efficiency, and sustainable transportation technologies.",
            (Topic::ClimateChange, Business) => "Climate change presents both risks and opportunities for businesses. Companies are adopting sustainability practices, ESG reporting, carbon accounting, and climate risk assessments. Green finance and sustainable business models are becoming competitive advantages.",
            (Topic::ClimateChange, Social) => "Climate change disproportionately affects vulnerable populations and raises questions of climate justice, adaptation strategies, and international cooperation. Social movements and policy advocacy play crucial roles in driving climate action.",

            (Topic::Blockchain, General) => "Blockchain is a distributed ledger technology that maintains a continuously growing list of records, linked and secured using cryptography. It enables decentralized, transparent, and immutable record-keeping without requiring a central authority.",
            (Topic::Blockchain, Technical) => "Blockchain systems use cryptographic hashing, consensus mechanisms (Proof of Work, Proof of Stake), smart contracts, and distributed networks. Key technical challenges include scalability, energy consumption, and interoperability between different blockchain networks.",
            (Topic::Blockchain, Business) => "Blockchain applications span cryptocurrency, supply chain management, digital identity, decentralized finance (DeFi), and non-fungible tokens (NFTs). Businesses are exploring blockchain for transparency, reducing intermediaries, and creating new business models.",
            (Topic::Blockchain, Social) => "Blockchain raises questions about financial inclusion, regulatory frameworks, energy consumption, and the decentralization of traditional institutions. It has potential to increase transparency and reduce corruption in various sectors.",
        }
    }
}

/// Perspective lens applied to a topic's insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    #[default]
    General,
    Technical,
    Business,
    Social,
}

impl FocusArea {
    pub const ALL: [FocusArea; 4] = [FocusArea::General, FocusArea::Technical, FocusArea::Business, FocusArea::Social];

    pub fn label(&self) -> &'static str {
        match self {
            FocusArea::General => "general",
            FocusArea::Technical => "technical",
            FocusArea::Business => "business",
            FocusArea::Social => "social",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        Self::ALL.into_iter().find(|f| f.label() == key)
    }
}
