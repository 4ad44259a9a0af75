//! Static knowledge base and the resolver over it.
//!
//! ## Knowledge Base Layout
//!
//! | Table  | Key                              | Value                                   |
//! |--------|----------------------------------|-----------------------------------------|
//! | Topics | [`Topic`] × [`FocusArea`]        | one pre-authored insight paragraph      |
//! | Trends | [`TrendDomain`]                  | [`TrendAnalysis`] (rendered to one text) |
//!
//! Both tables are `'static` data behind exhaustive `match`es: every topic defines every focus
//! area, and nothing is ever mutated after compilation.

mod resolver;
mod topics;
mod trends;

pub use resolver::{KnowledgeResolver, Research, ResearchStatus, TrendReport, ANALYSIS_DATE, LAST_UPDATED, METHODOLOGY};
pub use topics::{FocusArea, Topic};
pub use trends::{TrendAnalysis, TrendDomain};

/// Trims and lowercases a lookup key. Case-insensitive matching goes through here.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Joins labels as "a, b, c" for fallback messages.
pub(crate) fn join_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    labels.into_iter().collect::<Vec<_>>().join(", ")
}
