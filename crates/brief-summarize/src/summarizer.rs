//! Extractive summarizer entry point.

use std::collections::BTreeSet;

use brief_core::{IndexedMessage, Topic};
use serde::Serialize;
use tracing::debug;

use crate::select::{self, MAX_SENTENCES};
use crate::sentence::{self, build_docs, SentenceDoc};
use crate::stemmer::stem;

/// Summary returned when a unit has no messages.
pub const NO_ACTIVITY_SUMMARY: &str = "No notable discussion in this period.";
/// Longest sentence text shown in one bullet.
pub const MAX_BULLET_CHARS: usize = 180;
/// Raw messages used when no sentence survives filtering.
pub const FALLBACK_MESSAGES: usize = 3;
const ELLIPSIS: char = '…';

/// How a summary was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMethod {
    Extractive,
    /// First raw messages, because nothing survived filtering.
    Fallback,
    Empty,
    /// Replaced by an external enhancer.
    Enhanced,
}

/// Summary text with usage placeholders and the messages it drew from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    pub selected_ids: Vec<String>,
    pub tokens_in: u32,
    pub tokens_out: u32,
    pub cost_usd: f64,
    pub method: SummaryMethod,
}

impl SummaryResult {
    fn local(summary: String, selected_ids: Vec<String>, method: SummaryMethod) -> Self {
        Self {
            summary,
            selected_ids,
            tokens_in: 0,
            tokens_out: 0,
            cost_usd: 0.0,
            method,
        }
    }

    pub fn bullet_count(&self) -> usize {
        self.summary.lines().filter(|l| l.starts_with('•')).count()
    }
}

/// Topic context for a summary: a label, optionally with its taxonomy terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTopic {
    pub label: String,
    pub keywords: Vec<String>,
    pub bigrams: Vec<String>,
}

impl SummaryTopic {
    /// Stemmed terms that earn the topic boost: unigrams and stemmed bigrams.
    pub fn terms(&self) -> BTreeSet<String> {
        let phrases = std::iter::once(&self.label)
            .chain(self.keywords.iter())
            .chain(self.bigrams.iter());

        phrases.fold(BTreeSet::new(), |mut terms, phrase| {
            let normalized = sentence::normalize(phrase);
            let stems: Vec<String> = sentence::tokenize(&normalized)
                .into_iter()
                .map(stem)
                .collect();
            if stems.len() > 1 {
                terms.extend(stems.windows(2).map(|w| w.join(" ")));
            }
            terms.extend(stems);
            terms
        })
    }
}

impl From<&str> for SummaryTopic {
    fn from(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }
}

impl From<&Topic> for SummaryTopic {
    fn from(topic: &Topic) -> Self {
        Self {
            label: topic.slug.clone(),
            keywords: topic.keywords.clone(),
            bigrams: topic.bigrams.clone(),
        }
    }
}

/// Stateless summarizer; every call owns its intermediate sentence docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, messages: &[IndexedMessage], topic: &SummaryTopic) -> SummaryResult {
        if messages.is_empty() {
            return SummaryResult::local(
                NO_ACTIVITY_SUMMARY.to_string(),
                Vec::new(),
                SummaryMethod::Empty,
            );
        }

        let docs = build_docs(messages);
        if docs.is_empty() {
            debug!(
                "No sentences survived filtering for topic {}, using raw messages",
                topic.label
            );
            return fallback(messages);
        }

        let scores = select::score_sentences(&docs, &topic.terms());
        let picked = select::mmr_select(&docs, &scores, MAX_SENTENCES);
        let kept = select::enforce_length(&docs, picked);

        let kept_docs: Vec<&SentenceDoc> = kept.iter().map(|&i| &docs[i]).collect();
        let summary = kept_docs
            .iter()
            .map(|d| bullet(&d.author, &d.text))
            .collect::<Vec<_>>()
            .join("\n");
        let selected_ids = unique_in_order(kept_docs.iter().map(|d| d.message_id.as_str()));

        debug!(
            "Summarized {} messages ({} sentences) into {} bullets for topic {}",
            messages.len(),
            docs.len(),
            kept_docs.len(),
            topic.label
        );
        SummaryResult::local(summary, selected_ids, SummaryMethod::Extractive)
    }
}

fn fallback(messages: &[IndexedMessage]) -> SummaryResult {
    let firsts = &messages[..messages.len().min(FALLBACK_MESSAGES)];
    let summary = firsts
        .iter()
        .map(|m| {
            let flat = m.content.split_whitespace().collect::<Vec<_>>().join(" ");
            bullet(&m.author_name, &flat)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let ids = unique_in_order(firsts.iter().map(|m| m.id.as_str()));
    SummaryResult::local(summary, ids, SummaryMethod::Fallback)
}

fn bullet(author: &str, text: &str) -> String {
    format!("• {}: {}", author, truncate(text, MAX_BULLET_CHARS))
}

/// Cut to at most `max` chars, ending with an ellipsis when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}{}", head.trim_end(), ELLIPSIS)
}

fn unique_in_order<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}
