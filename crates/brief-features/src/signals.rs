//! Per-message signals: decision verbs, topic hits, reaction weight.

use std::collections::HashSet;

use brief_core::{EngineConfig, Reaction, Topic};
use once_cell::sync::Lazy;
use regex::Regex;

/// Verbs that mark a discussion moving toward an outcome.
static DECISION_VERBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(decid(?:e|ed|es|ing)|decision|approv(?:e|ed|es|al|ing)|ship(?:s|ped|ping)?|block(?:ed|er|ers|ing)?|eta|owner(?:s)?|assign(?:ed)?|deadline|sign(?:ed)?[- ]off|go[- ]live)\b",
    )
    .expect("decision verb pattern is valid")
});

/// Number of decision-verb occurrences in raw message content.
pub fn decision_verb_hits(content: &str) -> u32 {
    DECISION_VERBS.find_iter(content).count() as u32
}

/// Lowercase, replace non-alphanumerics with spaces, collapse whitespace.
pub fn normalize_content(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sum of `count × weight(emoji)` over a message's reactions.
pub fn reaction_weight(reactions: &[Reaction], config: &EngineConfig) -> f64 {
    reactions
        .iter()
        .map(|r| r.count as f64 * config.reaction_weight(&r.emoji))
        .sum()
}

/// A topic with its keywords and bigrams normalized once per run.
#[derive(Debug, Clone)]
pub struct PreparedTopic {
    pub slug: String,
    pub keywords: HashSet<String>,
    pub bigrams: Vec<String>,
    pub boost: f64,
}

impl PreparedTopic {
    pub fn new(topic: &Topic) -> Self {
        Self {
            slug: topic.slug.clone(),
            keywords: topic
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            bigrams: topic
                .bigrams
                .iter()
                .map(|b| normalize_content(b))
                .filter(|b| !b.is_empty())
                .collect(),
            boost: topic.boost,
        }
    }

    /// Matched keywords (already lowercased) that belong to this topic.
    pub fn keyword_hits<'a, I>(&self, matched: I) -> u32
    where
        I: IntoIterator<Item = &'a String>,
    {
        matched
            .into_iter()
            .filter(|k| self.keywords.contains(k.as_str()))
            .count() as u32
    }

    /// Topic bigrams appearing as substrings of normalized content.
    pub fn bigram_hits(&self, normalized: &str) -> u32 {
        self.bigrams
            .iter()
            .filter(|b| normalized.contains(b.as_str()))
            .count() as u32
    }
}
