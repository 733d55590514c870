//! Input model: indexed messages, topic taxonomy and channel weights.
//!
//! Everything here is read-only to the engine. The message store hands over
//! messages already tagged with the subscribed keywords they matched.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Multiplier applied to channels absent from the weight map.
pub const DEFAULT_CHANNEL_WEIGHT: f64 = 1.0;
/// Lower clamp for channel weights (mutes a channel).
pub const MIN_CHANNEL_WEIGHT: f64 = 0.0;
/// Upper clamp for channel weights.
pub const MAX_CHANNEL_WEIGHT: f64 = 5.0;

/// One emoji reaction and how many users added it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub count: u32,
}

impl Reaction {
    pub fn new(emoji: impl Into<String>, count: u32) -> Self {
        Self {
            emoji: emoji.into(),
            count,
        }
    }
}

/// A chat message that matched at least one subscribed keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedMessage {
    pub id: String,
    /// Stable participant identity (used for unique-participant counts).
    pub author_id: String,
    /// Display name shown in summary bullets.
    pub author_name: String,
    pub content: String,
    pub channel_id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub link_count: u32,
}

impl IndexedMessage {
    /// Grouping key of the discussion unit: the thread, else the channel.
    pub fn unit_key(&self) -> &str {
        self.thread_id.as_deref().unwrap_or(&self.channel_id)
    }
}

/// A curated topic of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub slug: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub bigrams: Vec<String>,
    #[serde(default = "default_boost")]
    pub boost: f64,
}

fn default_boost() -> f64 {
    1.0
}

impl Topic {
    /// Topic with the given slug and no keywords.
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            keywords: Vec::new(),
            bigrams: Vec::new(),
            boost: default_boost(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bigrams<I, S>(mut self, bigrams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bigrams = bigrams.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }
}

/// Per-channel score multipliers, clamped to `[0, 5]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, f64>", into = "HashMap<String, f64>")]
pub struct ChannelWeights {
    weights: HashMap<String, f64>,
}

impl ChannelWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a channel's multiplier. Non-finite values are ignored.
    pub fn set(&mut self, channel_id: impl Into<String>, weight: f64) {
        if weight.is_finite() {
            self.weights.insert(
                channel_id.into(),
                weight.clamp(MIN_CHANNEL_WEIGHT, MAX_CHANNEL_WEIGHT),
            );
        }
    }

    /// Multiplier for a channel, `1.0` when the channel is not listed.
    pub fn multiplier(&self, channel_id: &str) -> f64 {
        self.weights
            .get(channel_id)
            .copied()
            .unwrap_or(DEFAULT_CHANNEL_WEIGHT)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl From<HashMap<String, f64>> for ChannelWeights {
    fn from(raw: HashMap<String, f64>) -> Self {
        let mut weights = ChannelWeights::new();
        for (channel_id, weight) in raw {
            weights.set(channel_id, weight);
        }
        weights
    }
}

impl From<ChannelWeights> for HashMap<String, f64> {
    fn from(weights: ChannelWeights) -> Self {
        weights.weights
    }
}
