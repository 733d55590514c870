//! Feature extraction: fold timestamp-ordered messages into discussion units.

use std::collections::{BTreeSet, HashMap};

use brief_core::{EngineConfig, IndexedMessage, Topic};
use tracing::debug;

use crate::signals::{self, PreparedTopic};
use crate::types::{ThreadFeature, TopicHitMetric};

/// Groups messages by thread (else channel) and aggregates their signals.
pub struct FeatureExtractor<'a> {
    config: &'a EngineConfig,
    topics: Vec<PreparedTopic>,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(config: &'a EngineConfig, topics: &[Topic]) -> Self {
        Self {
            config,
            topics: topics.iter().map(PreparedTopic::new).collect(),
        }
    }

    /// One feature per unit key, in first-seen order of the time-sorted input.
    pub fn extract(&self, messages: &[IndexedMessage]) -> Vec<ThreadFeature> {
        let mut ordered: Vec<&IndexedMessage> = messages.iter().collect();
        ordered.sort_by_key(|m| m.timestamp);

        let units = ordered
            .into_iter()
            .fold(UnitAccumulator::default(), |acc, msg| acc.absorb(msg, self));

        debug!(
            "Extracted {} discussion units from {} messages",
            units.features.len(),
            messages.len()
        );
        units.features
    }

    fn topic_hits(&self, msg: &IndexedMessage, keywords: &[String]) -> Vec<TopicHitMetric> {
        let normalized = signals::normalize_content(&msg.content);
        self.topics
            .iter()
            .filter_map(|topic| {
                let keyword_hits = topic.keyword_hits(keywords);
                let bigram_hits = topic.bigram_hits(&normalized);
                (keyword_hits > 0 || bigram_hits > 0).then(|| TopicHitMetric {
                    slug: topic.slug.clone(),
                    keyword_hits,
                    bigram_hits,
                    boost: topic.boost,
                })
            })
            .collect()
    }
}

/// Fold state: features in first-seen order plus a key → position index.
#[derive(Default)]
struct UnitAccumulator {
    features: Vec<ThreadFeature>,
    positions: HashMap<String, usize>,
}

impl UnitAccumulator {
    fn absorb(mut self, msg: &IndexedMessage, extractor: &FeatureExtractor<'_>) -> Self {
        let keywords: Vec<String> = msg
            .matched_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let hits = extractor.topic_hits(msg, &keywords);
        let reactions = signals::reaction_weight(&msg.reactions, extractor.config);
        let decisions = signals::decision_verb_hits(&msg.content);
        let cap = extractor.config.max_messages_per_unit;

        let key = msg.unit_key();
        let idx = match self.positions.get(key) {
            Some(&idx) => idx,
            None => {
                self.features.push(empty_feature(msg));
                self.positions.insert(key.to_string(), self.features.len() - 1);
                self.features.len() - 1
            }
        };

        let feature = &mut self.features[idx];
        feature.participants.insert(msg.author_id.clone());
        feature.message_count += 1;
        feature.link_count += msg.link_count;
        feature.reaction_score += reactions;
        feature.decision_hits += decisions;
        feature.first_message_at = feature.first_message_at.min(msg.timestamp);
        feature.last_message_at = feature.last_message_at.max(msg.timestamp);
        feature.keywords.extend(keywords);
        if feature.messages.len() < cap {
            feature.messages.push(msg.clone());
        }
        for hit in hits {
            merge_topic_hit(&mut feature.topic_hits, hit);
        }

        self
    }
}

fn empty_feature(msg: &IndexedMessage) -> ThreadFeature {
    ThreadFeature {
        key: msg.unit_key().to_string(),
        channel_id: msg.channel_id.clone(),
        thread_id: msg.thread_id.clone(),
        participants: BTreeSet::new(),
        message_count: 0,
        reaction_score: 0.0,
        topic_hits: Vec::new(),
        link_count: 0,
        decision_hits: 0,
        first_message_at: msg.timestamp,
        last_message_at: msg.timestamp,
        keywords: BTreeSet::new(),
        messages: Vec::new(),
    }
}

/// Add counts to an existing metric for the slug; boost stays as first copied.
fn merge_topic_hit(metrics: &mut Vec<TopicHitMetric>, hit: TopicHitMetric) {
    match metrics.iter_mut().find(|m| m.slug == hit.slug) {
        Some(existing) => {
            existing.keyword_hits += hit.keyword_hits;
            existing.bigram_hits += hit.bigram_hits;
        }
        None => metrics.push(hit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::Reaction;
    use chrono::{DateTime, Duration, Utc};

    fn base() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).unwrap()
    }

    fn msg(id: &str, author: &str, channel: &str, thread: Option<&str>, minutes: i64, content: &str) -> IndexedMessage {
        IndexedMessage {
            id: id.into(),
            author_id: author.into(),
            author_name: author.to_uppercase(),
            content: content.into(),
            channel_id: channel.into(),
            thread_id: thread.map(Into::into),
            timestamp: base() + Duration::minutes(minutes),
            matched_keywords: Vec::new(),
            reactions: Vec::new(),
            link_count: 0,
        }
    }

    #[test]
    fn test_empty_input() {
        let config = EngineConfig::default();
        let extractor = FeatureExtractor::new(&config, &[]);
        assert!(extractor.extract(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_thread_else_channel_in_first_seen_order() {
        let config = EngineConfig::default();
        let extractor = FeatureExtractor::new(&config, &[]);
        let messages = vec![
            msg("3", "u1", "c1", Some("t1"), 10, "thread reply"),
            msg("1", "u2", "c2", None, 0, "channel chatter"),
            msg("2", "u1", "c1", Some("t1"), 5, "thread start"),
            msg("4", "u3", "c2", None, 20, "more chatter"),
        ];

        let features = extractor.extract(&messages);
        assert_eq!(features.len(), 2);
        // Sorted by timestamp, c2 (minute 0) is seen before t1 (minute 5).
        assert_eq!(features[0].key, "c2");
        assert_eq!(features[0].thread_id, None);
        assert_eq!(features[1].key, "t1");
        assert_eq!(features[1].channel_id, "c1");

        let thread = &features[1];
        assert_eq!(thread.message_count, 2);
        assert_eq!(thread.unique_participants(), 1);
        assert_eq!(thread.first_message_at, base() + Duration::minutes(5));
        assert_eq!(thread.last_message_at, base() + Duration::minutes(10));
        let ids: Vec<&str> = thread.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_accumulates_signals() {
        let config = EngineConfig::default();
        let topics = vec![
            Topic::new("energy")
                .with_keywords(["solar"])
                .with_bigrams(["clean energy"])
                .with_boost(1.5),
            Topic::new("policy").with_keywords(["policy"]),
        ];
        let extractor = FeatureExtractor::new(&config, &topics);

        let mut a = msg("1", "u1", "c1", None, 0, "Clean energy and SOLAR: we decided to ship");
        a.matched_keywords = vec!["Solar".into()];
        a.reactions = vec![Reaction::new("🔥", 2), Reaction::new("🦀", 1)];
        a.link_count = 1;
        let mut b = msg("2", "u2", "c1", None, 1, "solar again, clean energy is the ETA");
        b.matched_keywords = vec!["solar".into(), "grid".into()];
        b.link_count = 1;

        let features = extractor.extract(&[a, b]);
        assert_eq!(features.len(), 1);
        let f = &features[0];
        assert_eq!(f.unique_participants(), 2);
        assert_eq!(f.link_count, 2);
        assert!(f.has_links());
        assert_eq!(f.reaction_score, 2.0 * 2.0 + 1.0);
        assert_eq!(f.decision_hits, 3);
        assert_eq!(
            f.keywords.iter().cloned().collect::<Vec<_>>(),
            vec!["grid".to_string(), "solar".to_string()]
        );

        // Only the energy topic was hit; policy never appears.
        assert_eq!(f.topic_hits.len(), 1);
        let energy = &f.topic_hits[0];
        assert_eq!(energy.slug, "energy");
        assert_eq!(energy.keyword_hits, 2);
        assert_eq!(energy.bigram_hits, 2);
        assert_eq!(energy.boost, 1.5);
    }

    #[test]
    fn test_message_sample_is_bounded() {
        let config = EngineConfig {
            max_messages_per_unit: 3,
            ..EngineConfig::default()
        };
        let extractor = FeatureExtractor::new(&config, &[]);
        let messages: Vec<IndexedMessage> = (0..10)
            .map(|i| msg(&i.to_string(), "u1", "c1", None, i, "chatter"))
            .collect();

        let features = extractor.extract(&messages);
        assert_eq!(features[0].message_count, 10);
        assert_eq!(features[0].messages.len(), 3);
    }
}
