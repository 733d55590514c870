//! Heuristic relevance scoring.

use brief_core::ChannelWeights;
use brief_features::ThreadFeature;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::{ScoreBreakdown, ThreadScore};

pub const PARTICIPANT_WEIGHT: f64 = 1.2;
pub const REACTION_WEIGHT: f64 = 0.8;
pub const TOPIC_WEIGHT: f64 = 1.3;
pub const LINK_WEIGHT: f64 = 1.1;
/// Flat link value once a unit is link-heavy.
pub const LINK_BONUS: f64 = 2.0;
pub const DECISION_WEIGHT: f64 = 1.4;
pub const DECISION_HIT_VALUE: f64 = 3.0;
/// Hours of inactivity that cost one point. Linear, no cap.
pub const DECAY_HOURS: f64 = 72.0;

/// Scores features against channel multipliers and a reference time.
pub struct ScoringService<'a> {
    weights: &'a ChannelWeights,
    now: DateTime<Utc>,
}

impl<'a> ScoringService<'a> {
    pub fn new(weights: &'a ChannelWeights, now: DateTime<Utc>) -> Self {
        Self { weights, now }
    }

    /// Score every feature and sort descending. Ties keep extraction order.
    pub fn score_all(&self, features: Vec<ThreadFeature>) -> Vec<ThreadScore> {
        let mut scores: Vec<ThreadScore> = features.into_iter().map(|f| self.score(f)).collect();
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(top) = scores.first() {
            debug!(
                "Scored {} units, top={} ({:.2})",
                scores.len(),
                top.feature.key,
                top.score
            );
        }
        scores
    }

    pub fn score(&self, feature: ThreadFeature) -> ThreadScore {
        let breakdown = self.breakdown(&feature);
        let multiplier = self.weights.multiplier(&feature.channel_id);
        ThreadScore {
            score: breakdown.raw_total() * multiplier,
            multiplier,
            breakdown,
            feature,
        }
    }

    pub fn breakdown(&self, feature: &ThreadFeature) -> ScoreBreakdown {
        let topic_sum: f64 = feature.topic_hits.iter().map(|m| m.weight()).sum();
        ScoreBreakdown {
            participants: PARTICIPANT_WEIGHT * feature.unique_participants() as f64,
            message_count: (feature.message_count as f64).ln_1p(),
            reactions: REACTION_WEIGHT * feature.reaction_score,
            topic_hits: TOPIC_WEIGHT * topic_sum,
            links: LINK_WEIGHT * if feature.has_links() { LINK_BONUS } else { 0.0 },
            decisions: DECISION_WEIGHT * feature.decision_hits as f64 * DECISION_HIT_VALUE,
            time_decay: (feature.hours_since_last_message(self.now) / DECAY_HOURS).max(0.0),
        }
    }
}
