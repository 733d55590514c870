//! Sparse weighted token vectors.

use std::collections::BTreeMap;

use crate::types::ThreadScore;

/// Token → weight. Ordered so every traversal is deterministic.
pub type SparseVector = BTreeMap<String, f64>;

/// Topic slugs weighted by their hit weight, plus 1 per matched keyword.
pub fn unit_vector(score: &ThreadScore) -> SparseVector {
    let topic_entries = score
        .feature
        .topic_hits
        .iter()
        .map(|m| (m.slug.as_str(), m.weight()))
        .filter(|(_, w)| *w > 0.0);
    let keyword_entries = score.feature.keywords.iter().map(|k| (k.as_str(), 1.0));

    topic_entries
        .chain(keyword_entries)
        .fold(SparseVector::new(), |mut vector, (token, weight)| {
            *vector.entry(token.to_string()).or_insert(0.0) += weight;
            vector
        })
}

/// Element-wise sum of several vectors.
pub fn sum<'a, I>(vectors: I) -> SparseVector
where
    I: IntoIterator<Item = &'a SparseVector>,
{
    vectors
        .into_iter()
        .flatten()
        .fold(SparseVector::new(), |mut total, (token, weight)| {
            *total.entry(token.clone()).or_insert(0.0) += weight;
            total
        })
}

/// Cosine similarity; `0.0` when either vector has zero norm.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(token, w)| large.get(token).map(|other| w * other))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// The `n` heaviest tokens, ties broken alphabetically.
pub fn top_tokens(vector: &SparseVector, n: usize) -> Vec<String> {
    let mut entries: Vec<(&String, &f64)> = vector.iter().filter(|(_, w)| **w > 0.0).collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    entries.into_iter().take(n).map(|(t, _)| t.clone()).collect()
}
