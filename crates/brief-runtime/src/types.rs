//! Digest request and report types.

use std::collections::BTreeSet;

use brief_core::{ChannelWeights, IndexedMessage, Topic};
use brief_rank::{ThemeAnalysis, ThreadScore, TopicCount};
use brief_summarize::SummaryResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything one digest run needs besides the clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestRequest {
    #[serde(default)]
    pub messages: Vec<IndexedMessage>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub channel_weights: ChannelWeights,
}

/// Summary of one top-ranked unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub key: String,
    pub channel_id: String,
    pub thread_id: Option<String>,
    /// Topic the summary was boosted toward.
    pub topic: String,
    pub score: f64,
    #[serde(flatten)]
    pub summary: SummaryResult,
}

/// Header statistics and run diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestHeader {
    pub message_count: usize,
    pub unit_count: usize,
    pub participant_count: usize,
    pub channel_count: usize,
    pub cluster_count: usize,
    pub top_topics: Vec<TopicCount>,
    pub global_top_tokens: Vec<String>,
    pub elapsed_ms: u64,
}

impl DigestHeader {
    pub(crate) fn collect(messages: &[IndexedMessage], scores: &[ThreadScore]) -> Self {
        let participants: BTreeSet<&str> = scores
            .iter()
            .flat_map(|s| s.feature.participants.iter().map(String::as_str))
            .collect();
        let channels: BTreeSet<&str> = scores
            .iter()
            .map(|s| s.feature.channel_id.as_str())
            .collect();

        Self {
            message_count: messages.len(),
            unit_count: scores.len(),
            participant_count: participants.len(),
            channel_count: channels.len(),
            ..Self::default()
        }
    }
}

/// Full output of one digest run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestReport {
    pub generated_at: DateTime<Utc>,
    pub header: DigestHeader,
    pub scores: Vec<ThreadScore>,
    pub themes: ThemeAnalysis,
    pub summaries: Vec<UnitSummary>,
}
