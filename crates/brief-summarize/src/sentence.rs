//! Sentence documents: normalization, tokens, n-grams and term frequencies.

use std::collections::{BTreeMap, BTreeSet};

use brief_core::IndexedMessage;
use chrono::{DateTime, Utc};

use crate::clean;
use crate::stemmer::stem;

pub const MIN_TOKEN_CHARS: usize = 2;
pub const MAX_TOKEN_CHARS: usize = 24;

/// English stopwords plus chat filler and the cleaning placeholders.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him",
    "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more",
    "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours", "im", "ive", "dont", "cant", "wont", "thats",
    // chat filler
    "lol", "ok", "okay", "yeah", "yep", "hey", "hi", "thanks", "thank", "thx", "pls", "please",
    "gonna", "wanna", "btw", "imo",
    // cleaning placeholders
    "link", "someone", "channel", "role", "everyone",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// One sentence of a discussion unit, ready for scoring.
#[derive(Debug, Clone)]
pub struct SentenceDoc {
    pub message_id: String,
    pub author: String,
    pub text: String,
    pub normalized: String,
    pub tokens: Vec<String>,
    pub ngrams: Vec<String>,
    pub term_freq: BTreeMap<String, usize>,
    pub unique_tokens: BTreeSet<String>,
    pub term_count: usize,
    pub position: usize,
    pub timestamp: DateTime<Utc>,
}

impl SentenceDoc {
    /// Distinct terms (tokens and n-grams), used for redundancy checks.
    pub fn term_set(&self) -> BTreeSet<&str> {
        self.term_freq.keys().map(String::as_str).collect()
    }
}

/// Lowercase, keep alphanumerics and placeholder brackets, collapse spaces.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '[' || c == ']' {
                c
            } else {
                ' '
            }
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text on non-alphanumeric boundaries.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Stemmed, stopword-free tokens of the allowed length.
pub fn filtered_tokens(normalized: &str) -> Vec<String> {
    tokenize(normalized)
        .into_iter()
        .filter(|raw| !is_stopword(raw))
        .map(stem)
        .filter(|t| {
            let len = t.chars().count();
            (MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&len) && !is_stopword(t)
        })
        .collect()
}

/// Adjacent bigrams followed by trigrams.
pub fn ngrams(tokens: &[String]) -> Vec<String> {
    let bigrams = tokens.windows(2).map(|w| w.join(" "));
    let trigrams = tokens.windows(3).map(|w| w.join(" "));
    bigrams.chain(trigrams).collect()
}

/// Clean and split every message, keeping sentences that retain tokens.
pub fn build_docs(messages: &[IndexedMessage]) -> Vec<SentenceDoc> {
    messages
        .iter()
        .flat_map(|msg| {
            clean::split_sentences(&clean::clean_message(&msg.content))
                .into_iter()
                .map(move |text| (msg, text))
        })
        .filter_map(|(msg, text)| {
            let normalized = normalize(&text);
            let tokens = filtered_tokens(&normalized);
            if tokens.is_empty() {
                return None;
            }
            let grams = ngrams(&tokens);
            let term_freq = tokens.iter().chain(grams.iter()).fold(
                BTreeMap::new(),
                |mut tf: BTreeMap<String, usize>, term| {
                    *tf.entry(term.clone()).or_insert(0) += 1;
                    tf
                },
            );
            Some(SentenceDoc {
                message_id: msg.id.clone(),
                author: msg.author_name.clone(),
                unique_tokens: tokens.iter().cloned().collect(),
                term_count: tokens.len() + grams.len(),
                text,
                normalized,
                tokens,
                ngrams: grams,
                term_freq,
                position: 0,
                timestamp: msg.timestamp,
            })
        })
        .enumerate()
        .map(|(position, doc)| SentenceDoc { position, ..doc })
        .collect()
}

/// Number of sentences each term appears in.
pub fn document_frequency(docs: &[SentenceDoc]) -> BTreeMap<&str, usize> {
    docs.iter()
        .flat_map(|d| d.term_freq.keys())
        .fold(BTreeMap::new(), |mut df, term| {
            *df.entry(term.as_str()).or_insert(0) += 1;
            df
        })
}
