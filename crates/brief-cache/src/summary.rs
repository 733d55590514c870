//! Cache of extractive summaries keyed by their exact input.

use std::sync::Arc;

use brief_core::{Clock, IndexedMessage};
use brief_summarize::{SummaryResult, SummaryTopic};
use chrono::Duration;
use sha2::{Digest, Sha256};

use crate::ttl::TtlCache;

/// SHA-256 over the full topic (label, keywords, bigrams) and every
/// message's id, author name and content.
///
/// Keywords and bigrams are sorted first; their order never changes a summary.
pub fn summary_key(topic: &SummaryTopic, messages: &[IndexedMessage]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(topic.label.as_bytes());
    for terms in [&topic.keywords, &topic.bigrams] {
        let mut sorted: Vec<&str> = terms.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        hasher.update([1u8]);
        for term in sorted {
            hasher.update(term.as_bytes());
            hasher.update([0u8]);
        }
    }
    for msg in messages {
        hasher.update([1u8]);
        for field in [&msg.id, &msg.author_name, &msg.content] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
    }
    hex::encode(hasher.finalize())
}

/// Summaries reused while their input is unchanged and the TTL holds.
pub struct SummaryCache {
    entries: TtlCache<String, SummaryResult>,
}

impl SummaryCache {
    pub fn new(max_size: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: TtlCache::new(max_size, ttl, clock),
        }
    }

    pub fn get(&self, topic: &SummaryTopic, messages: &[IndexedMessage]) -> Option<SummaryResult> {
        self.entries.get(&summary_key(topic, messages))
    }

    pub fn put(&self, topic: &SummaryTopic, messages: &[IndexedMessage], result: SummaryResult) {
        self.entries.put(summary_key(topic, messages), result);
    }

    /// Called by the owner's ticker.
    pub fn evict_expired(&self) -> usize {
        self.entries.evict_expired()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::ManualClock;
    use brief_summarize::ExtractiveSummarizer;
    use chrono::{DateTime, Utc};

    fn message(id: &str, content: &str) -> IndexedMessage {
        IndexedMessage {
            id: id.into(),
            author_id: "u1".into(),
            author_name: "Ada".into(),
            content: content.into(),
            channel_id: "c1".into(),
            thread_id: None,
            timestamp: DateTime::<Utc>::from_timestamp(1_760_000_000, 0).unwrap(),
            matched_keywords: Vec::new(),
            reactions: Vec::new(),
            link_count: 0,
        }
    }

    fn energy(keywords: &[&str]) -> SummaryTopic {
        SummaryTopic {
            label: "energy".into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            bigrams: vec!["clean energy".into()],
        }
    }

    #[test]
    fn test_key_depends_on_topic_and_messages() {
        let a = vec![message("m1", "solar grid")];
        let topic = energy(&["solar", "grid"]);
        let key = summary_key(&topic, &a);
        assert_eq!(key.len(), 64);
        assert_eq!(key, summary_key(&topic, &a));
        assert_ne!(key, summary_key(&SummaryTopic::from("policy"), &a));
        assert_ne!(key, summary_key(&topic, &[message("m2", "solar grid")]));
        assert_ne!(key, summary_key(&topic, &[message("m1", "solar grid!")]));

        let mut renamed = message("m1", "solar grid");
        renamed.author_name = "Bea".into();
        assert_ne!(key, summary_key(&topic, &[renamed]));
    }

    #[test]
    fn test_key_tracks_taxonomy_terms() {
        let a = vec![message("m1", "solar grid")];
        let key = summary_key(&energy(&["solar", "grid"]), &a);

        // Same slug, different keywords or bigrams: different key.
        assert_ne!(key, summary_key(&energy(&["solar"]), &a));
        let mut no_bigrams = energy(&["solar", "grid"]);
        no_bigrams.bigrams.clear();
        assert_ne!(key, summary_key(&no_bigrams, &a));

        // Term order does not matter.
        assert_eq!(key, summary_key(&energy(&["grid", "solar"]), &a));
    }

    #[test]
    fn test_round_trip_and_expiry() {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_760_000_000, 0).unwrap(),
        ));
        let cache = SummaryCache::new(8, Duration::minutes(30), clock.clone());
        let messages = vec![message("m1", "Solar grid upgrade approved.")];
        let topic = SummaryTopic::from("energy");
        let result = ExtractiveSummarizer::new().summarize(&messages, &topic);

        cache.put(&topic, &messages, result.clone());
        assert_eq!(cache.get(&topic, &messages), Some(result));
        assert!(cache.get(&SummaryTopic::from("policy"), &messages).is_none());

        clock.advance(Duration::minutes(31));
        assert_eq!(cache.evict_expired(), 1);
        assert!(cache.is_empty());
    }
}
