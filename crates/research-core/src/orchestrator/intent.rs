//! Keyword routing from a free-text message to a concrete goal.
//!
//! One message maps to one lookup. Anything unrecognized is passed through as the topic or
//! domain so the resolver answers with its fallback text.

use crate::knowledge::{FocusArea, Topic, TrendDomain};

const TOPIC_PHRASES: [(&str, Topic); 3] = [
    ("artificial intelligence", Topic::ArtificialIntelligence),
    ("climate change", Topic::ClimateChange),
    ("blockchain", Topic::Blockchain),
];

const TOPIC_WORDS: [(&str, Topic); 3] = [
    ("ai", Topic::ArtificialIntelligence),
    ("climate", Topic::ClimateChange),
    ("blockchains", Topic::Blockchain),
];

const FOCUS_WORDS: [(&str, FocusArea); 8] = [
    ("general", FocusArea::General),
    ("simple", FocusArea::General),
    ("technical", FocusArea::Technical),
    ("technically", FocusArea::Technical),
    ("business", FocusArea::Business),
    ("businesses", FocusArea::Business),
    ("social", FocusArea::Social),
    ("society", FocusArea::Social),
];

const DOMAIN_WORDS: [(&str, TrendDomain); 6] = [
    ("technology", TrendDomain::Technology),
    ("tech", TrendDomain::Technology),
    ("business", TrendDomain::Business),
    ("businesses", TrendDomain::Business),
    ("science", TrendDomain::Science),
    ("scientific", TrendDomain::Science),
];

const LEAD_INS: [&str; 7] = [
    "what can you tell me about ",
    "can you research ",
    "tell me about ",
    "what about ",
    "research ",
    "explain ",
    "analyze ",
];

/// The lookup a chat message resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutedGoal {
    /// Topic research; `focus_area` is always filled (`general` when the message names none).
    Research { topic: String, focus_area: String },
    Trends { domain: String },
}

impl RoutedGoal {
    /// Name of the equivalent [`crate::Goal`] variant.
    pub fn label(&self) -> &'static str {
        match self {
            RoutedGoal::Research { .. } => "ResearchTopic",
            RoutedGoal::Trends { .. } => "AnalyzeTrends",
        }
    }
}

/// Routes `message` to a trend analysis when it asks about trends, otherwise to topic research.
pub fn route_message(message: &str) -> RoutedGoal {
    let lower = message.trim().to_lowercase();
    let words = tokenize(&lower);

    if words.iter().any(|w| w.starts_with("trend")) {
        let domain = first_match(&words, &DOMAIN_WORDS)
            .map(|d| d.label().to_string())
            .unwrap_or_else(|| subject_phrase(&lower));
        return RoutedGoal::Trends { domain };
    }

    let topic = TOPIC_PHRASES
        .iter()
        .filter_map(|(phrase, t)| lower.find(phrase).map(|pos| (pos, *t)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, t)| t)
        .or_else(|| first_match(&words, &TOPIC_WORDS));
    let focus = first_match(&words, &FOCUS_WORDS);

    RoutedGoal::Research {
        topic: topic
            .map(|t| t.label().to_string())
            .unwrap_or_else(|| subject_phrase(&lower)),
        focus_area: focus.unwrap_or_default().label().to_string(),
    }
}

fn tokenize(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// First table entry matching a word, in message order.
fn first_match<T: Copy>(words: &[&str], table: &[(&str, T)]) -> Option<T> {
    words
        .iter()
        .find_map(|w| table.iter().find(|(k, _)| k == w).map(|(_, v)| *v))
}

/// Best-effort subject of an unrecognized request, used only in fallback text.
fn subject_phrase(lower: &str) -> String {
    let trimmed = lower.trim_end_matches(|c: char| c == '?' || c == '.' || c == '!');
    if let Some((_, after)) = trimmed.rsplit_once(" in ") {
        return after.trim().to_string();
    }
    LEAD_INS
        .iter()
        .find_map(|lead| trimmed.strip_prefix(lead))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn research(goal: RoutedGoal) -> (String, String) {
        match goal {
            RoutedGoal::Research { topic, focus_area } => (topic, focus_area),
            other => panic!("expected Research, got {:?}", other),
        }
    }

    fn trends(goal: RoutedGoal) -> String {
        match goal {
            RoutedGoal::Trends { domain } => domain,
            other => panic!("expected Trends, got {:?}", other),
        }
    }

    #[test]
    fn routes_topic_and_focus() {
        assert_eq!(
            research(route_message("Research artificial intelligence with a technical focus")),
            ("artificial intelligence".into(), "technical".into())
        );
        assert_eq!(
            research(route_message("Can you research climate change from a social perspective?")),
            ("climate change".into(), "social".into())
        );
        assert_eq!(
            research(route_message("Tell me about blockchain technology with a focus on business aspects")),
            ("blockchain".into(), "business".into())
        );
    }

    #[test]
    fn short_forms_and_default_focus() {
        assert_eq!(
            research(route_message("How is AI changing the business landscape?")),
            ("artificial intelligence".into(), "business".into())
        );
        assert_eq!(
            research(route_message("What can you tell me about artificial intelligence?")),
            ("artificial intelligence".into(), "general".into())
        );
        // "ai" must be a whole word.
        assert_eq!(research(route_message("Explain blockchain")).0, "blockchain");
    }

    #[test]
    fn routes_trend_questions_by_domain() {
        assert_eq!(trends(route_message("Analyze current trends in technology")), "technology");
        assert_eq!(trends(route_message("What are the emerging trends in business?")), "business");
        assert_eq!(trends(route_message("Analyze trends in scientific research")), "science");
        assert_eq!(trends(route_message("What are the latest technology trends?")), "technology");
    }

    #[test]
    fn unknown_subjects_pass_through() {
        assert_eq!(research(route_message("Research quantum mechanics")).0, "quantum mechanics");
        assert_eq!(
            research(route_message("Tell me about cryptocurrency regulations")).0,
            "cryptocurrency regulations"
        );
        assert_eq!(trends(route_message("Analyze trends in space exploration")), "space exploration");
        assert_eq!(
            trends(route_message("What about renewable energy trends?")),
            "renewable energy trends"
        );
    }

    #[test]
    fn labels_name_the_matching_goal() {
        assert_eq!(route_message("Research blockchain").label(), "ResearchTopic");
        assert_eq!(route_message("Analyze trends in business").label(), "AnalyzeTrends");
    }

    #[test]
    fn empty_message_routes_to_unknown_topic() {
        assert_eq!(research(route_message("   ")), (String::new(), "general".into()));
    }
}
