//! Ranking output types.

use brief_features::ThreadFeature;
use serde::Serialize;

/// Named terms that make up a unit's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub participants: f64,
    pub message_count: f64,
    pub reactions: f64,
    pub topic_hits: f64,
    pub links: f64,
    pub decisions: f64,
    pub time_decay: f64,
}

impl ScoreBreakdown {
    /// Positive terms minus the time decay, before the channel multiplier.
    pub fn raw_total(&self) -> f64 {
        self.participants
            + self.message_count
            + self.reactions
            + self.topic_hits
            + self.links
            + self.decisions
            - self.time_decay
    }
}

/// A scored discussion unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadScore {
    pub feature: ThreadFeature,
    pub score: f64,
    /// Channel multiplier the raw total was scaled by.
    pub multiplier: f64,
    pub breakdown: ScoreBreakdown,
}

/// One group of similar discussion units.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadCluster {
    pub id: String,
    pub label: String,
    pub members: Vec<ThreadScore>,
    pub top_tokens: Vec<String>,
}

impl ThreadCluster {
    pub fn member_keys(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.feature.key.as_str()).collect()
    }
}

/// Clusters plus the heaviest tokens across every unit.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAnalysis {
    pub clusters: Vec<ThreadCluster>,
    pub global_top_tokens: Vec<String>,
}

/// Aggregated hit count for one topic slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub slug: String,
    pub total: u32,
}
