//! Feature records produced per discussion unit.

use std::collections::BTreeSet;

use brief_core::IndexedMessage;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Link count at which a unit counts as link-heavy.
pub const LINK_THRESHOLD: u32 = 2;

/// Topic attribution accumulated over one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicHitMetric {
    pub slug: String,
    pub keyword_hits: u32,
    pub bigram_hits: u32,
    /// Copied from the topic when the metric was first created.
    pub boost: f64,
}

impl TopicHitMetric {
    /// `(keywordHits×2 + bigramHits×4) × boost`, shared by scoring and clustering.
    pub fn weight(&self) -> f64 {
        (self.keyword_hits as f64 * 2.0 + self.bigram_hits as f64 * 4.0) * self.boost
    }

    /// Unboosted hit count used for header statistics.
    pub fn hit_count(&self) -> u32 {
        self.keyword_hits + self.bigram_hits * 2
    }
}

/// Aggregated signals for one thread (or channel acting as a thread).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadFeature {
    /// Thread id, else channel id.
    pub key: String,
    pub channel_id: String,
    pub thread_id: Option<String>,
    pub participants: BTreeSet<String>,
    pub message_count: usize,
    pub reaction_score: f64,
    pub topic_hits: Vec<TopicHitMetric>,
    pub link_count: u32,
    pub decision_hits: u32,
    pub first_message_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub keywords: BTreeSet<String>,
    /// Bounded sample kept for summarization.
    #[serde(skip)]
    pub messages: Vec<IndexedMessage>,
}

impl ThreadFeature {
    pub fn unique_participants(&self) -> usize {
        self.participants.len()
    }

    pub fn has_links(&self) -> bool {
        self.link_count >= LINK_THRESHOLD
    }

    /// Hours between the last message and `now`, never negative.
    pub fn hours_since_last_message(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.last_message_at).num_milliseconds();
        (millis as f64 / 3_600_000.0).max(0.0)
    }
}
