//! Sentence relevance, MMR selection and length enforcement.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clean::LINK_PLACEHOLDER;
use crate::sentence::{document_frequency, SentenceDoc};

pub const MAX_SENTENCES: usize = 4;
/// Running character budget; the first accepted sentence is exempt.
pub const MAX_TOTAL_CHARS: usize = 380;
pub const RELEVANCE_WEIGHT: f64 = 0.72;
pub const REDUNDANCY_WEIGHT: f64 = 0.28;
pub const TOPIC_TERM_BOOST: f64 = 1.2;

const LEAD_POSITIONS: usize = 3;
const LEAD_BONUS: f64 = 0.2;
const DECISION_BONUS: f64 = 0.6;
const LATE_DECISION_BONUS: f64 = 0.3;
const DIGIT_BONUS: f64 = 0.2;
const LINK_BONUS: f64 = 0.2;

/// Decision language, matched against normalized (lowercase) sentences.
static DECISION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:decid\w*|decision\w*|approv\w*|agree[ds]?|ship(?:s|ped|ping)?|block(?:ed|er|ers|ing)?|eta|owners?|assign(?:ed)?|deadlines?|sign(?:ed)? off|go live|launch(?:ed|es|ing)?|merg(?:e|ed|ing))\b",
    )
    .unwrap()
});

/// Relevance of every sentence, index-aligned with `docs`.
pub fn score_sentences(docs: &[SentenceDoc], topic_terms: &BTreeSet<String>) -> Vec<f64> {
    let df = document_frequency(docs);
    let n = docs.len() as f64;
    let late_from = docs.len().saturating_sub(2);

    docs.iter()
        .map(|doc| {
            let tfidf: f64 = doc
                .term_freq
                .iter()
                .map(|(term, &tf)| {
                    let doc_freq = df.get(term.as_str()).copied().unwrap_or(0) as f64;
                    let idf = ((n + 1.0) / (doc_freq + 1.0)).ln() + 1.0;
                    let boost = if topic_terms.contains(term) {
                        TOPIC_TERM_BOOST
                    } else {
                        1.0
                    };
                    tf as f64 * idf * boost
                })
                .sum();

            let mut score = tfidf;
            if doc.position < LEAD_POSITIONS {
                score += LEAD_BONUS;
            }
            if DECISION_PATTERN.is_match(&doc.normalized) {
                score += DECISION_BONUS;
                if doc.position >= late_from {
                    score += LATE_DECISION_BONUS;
                }
            }
            if doc.text.chars().any(|c| c.is_ascii_digit()) {
                score += DIGIT_BONUS;
            }
            if doc.normalized.contains(LINK_PLACEHOLDER) {
                score += LINK_BONUS;
            }
            score
        })
        .collect()
}

/// Jaccard similarity of two sentences' term sets; `0.0` when both are empty.
pub fn jaccard(a: &SentenceDoc, b: &SentenceDoc) -> f64 {
    let (ta, tb) = (a.term_set(), b.term_set());
    let union = ta.union(&tb).count();
    if union == 0 {
        return 0.0;
    }
    ta.intersection(&tb).count() as f64 / union as f64
}

/// Maximal Marginal Relevance: indices into `docs` in pick order.
pub fn mmr_select(docs: &[SentenceDoc], scores: &[f64], limit: usize) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..docs.len()).collect();
    candidates.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut selected: Vec<usize> = Vec::with_capacity(limit);
    while selected.len() < limit && !candidates.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (slot, &idx) in candidates.iter().enumerate() {
            let redundancy = selected
                .iter()
                .map(|&s| jaccard(&docs[idx], &docs[s]))
                .fold(0.0, f64::max);
            let mmr = RELEVANCE_WEIGHT * scores[idx] - REDUNDANCY_WEIGHT * redundancy;
            if best.map_or(true, |(_, b)| mmr > b) {
                best = Some((slot, mmr));
            }
        }
        match best {
            Some((slot, _)) => selected.push(candidates.remove(slot)),
            None => break,
        }
    }
    selected
}

/// Re-sort picks into reading order and apply the sentence and char budgets.
pub fn enforce_length(docs: &[SentenceDoc], mut selected: Vec<usize>) -> Vec<usize> {
    selected.sort_by_key(|&i| docs[i].position);

    let mut kept = Vec::with_capacity(MAX_SENTENCES);
    let mut total = 0;
    for idx in selected {
        if kept.len() >= MAX_SENTENCES {
            break;
        }
        let len = docs[idx].text.chars().count();
        if !kept.is_empty() && total + len > MAX_TOTAL_CHARS {
            break;
        }
        total += len;
        kept.push(idx);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::build_docs;
    use brief_core::IndexedMessage;
    use chrono::DateTime;

    fn message(id: &str, content: &str) -> IndexedMessage {
        IndexedMessage {
            id: id.into(),
            author_id: "u1".into(),
            author_name: "Ada".into(),
            content: content.into(),
            channel_id: "c1".into(),
            thread_id: None,
            timestamp: DateTime::from_timestamp(1_760_000_000, 0).unwrap(),
            matched_keywords: Vec::new(),
            reactions: Vec::new(),
            link_count: 0,
        }
    }

    #[test]
    fn test_bonuses() {
        let docs = build_docs(&[
            message("m1", "alpha beta."),
            message("m2", "gamma delta."),
            message("m3", "epsilon zeta."),
            message("m4", "theta iota."),
            message("m5", "kappa lambda 42."),
            message("m6", "see www.example.com kappa."),
            message("m7", "we decided omicron."),
        ]);
        let scores = score_sentences(&docs, &BTreeSet::new());
        // Identical term structure: two unique tokens + one bigram, all df=1.
        let base = 3.0 * ((8.0f64 / 2.0).ln() + 1.0);
        assert!((scores[0] - (base + 0.2)).abs() < 1e-9);
        assert!((scores[2] - (base + 0.2)).abs() < 1e-9);
        assert!((scores[3] - base).abs() < 1e-9);
        assert!(scores[4] > scores[3]);
        // Late decision sentence gets both decision bonuses.
        assert_eq!(docs[6].tokens, vec!["decid", "omicron"]);
        assert!((scores[6] - (base + 0.6 + 0.3)).abs() < 1e-9);
        // Link placeholder bonus.
        assert!(docs[5].normalized.contains("[link]"));
    }

    #[test]
    fn test_link_bonus() {
        let docs = build_docs(&[
            message("m1", "see www.example.com kappa."),
            message("m2", "see kappa."),
        ]);
        // The placeholder is a stopword, so both sentences share the same terms.
        assert_eq!(docs[0].tokens, docs[1].tokens);
        assert!(docs[0].normalized.contains(LINK_PLACEHOLDER));
        let scores = score_sentences(&docs, &BTreeSet::new());
        assert!((scores[0] - scores[1] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_decision_pattern_covers_outcome_phrasing() {
        for sentence in [
            "we decided on it",
            "eta friday",
            "agreed with the plan",
            "launched today",
            "merged the fix",
            "sign off from legal",
        ] {
            assert!(DECISION_PATTERN.is_match(sentence), "{}", sentence);
        }
        assert!(!DECISION_PATTERN.is_match("shipment relationship zeta"));
    }

    #[test]
    fn test_topic_boost() {
        let docs = build_docs(&[message("m1", "solar power."), message("m2", "lunch menu.")]);
        let topic: BTreeSet<String> = ["solar".to_string()].into_iter().collect();
        let scores = score_sentences(&docs, &topic);
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_jaccard() {
        let docs = build_docs(&[
            message("m1", "solar grid."),
            message("m2", "solar grid."),
            message("m3", "lunch menu."),
        ]);
        assert_eq!(jaccard(&docs[0], &docs[1]), 1.0);
        assert_eq!(jaccard(&docs[0], &docs[2]), 0.0);
    }

    #[test]
    fn test_mmr_skips_duplicates() {
        let docs = build_docs(&[
            message("m1", "solar grid upgrade plan."),
            message("m2", "solar grid upgrade plan."),
            message("m3", "lunch menu."),
        ]);
        // Force the duplicate pair to outrank the distinct sentence slightly.
        let scores = vec![1.0, 0.99, 0.9];
        let picked = mmr_select(&docs, &scores, 2);
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn test_enforce_length_budget() {
        let long = "word ".repeat(70);
        let docs = build_docs(&[
            message("m1", &format!("{}end.", long)),
            message("m2", "short one."),
            message("m3", &format!("{}again.", long)),
        ]);
        assert!(docs[0].text.chars().count() > 300);
        // First accepted sentence is exempt, the next long one would overflow.
        let kept = enforce_length(&docs, vec![2, 0, 1]);
        assert_eq!(kept, vec![0, 1]);
    }
}
