//! Topic roll-up for digest header statistics.

use std::collections::BTreeMap;

use crate::types::{ThreadScore, TopicCount};

/// Topics reported in the header.
pub const HEADER_TOPICS: usize = 3;

/// Sum `keywordHits + bigramHits×2` per slug; return the `limit` largest.
pub fn top_topics(scores: &[ThreadScore], limit: usize) -> Vec<TopicCount> {
    let totals = scores
        .iter()
        .flat_map(|s| s.feature.topic_hits.iter())
        .fold(BTreeMap::<&str, u32>::new(), |mut totals, metric| {
            *totals.entry(metric.slug.as_str()).or_insert(0) += metric.hit_count();
            totals
        });

    let mut counts: Vec<TopicCount> = totals
        .into_iter()
        .filter(|(_, total)| *total > 0)
        .map(|(slug, total)| TopicCount {
            slug: slug.to_string(),
            total,
        })
        .collect();
    // BTreeMap order makes the stable sort break ties by slug.
    counts.sort_by(|a, b| b.total.cmp(&a.total));
    counts.truncate(limit);
    counts
}
