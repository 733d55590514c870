//! Theme clustering over sparse token vectors.
//!
//! A single greedy pass: each unassigned unit seeds a cluster and absorbs
//! every later unassigned unit close enough to the seed. Order-dependent; a
//! unit joins the first seed it is similar to even when a later seed would
//! fit better.

use brief_core::config::DEFAULT_CLUSTER_THRESHOLD;
use tracing::debug;

use crate::types::{ThemeAnalysis, ThreadCluster, ThreadScore};
use crate::vector::{self, SparseVector};

/// Tokens used for a cluster's label and top-token list.
pub const CLUSTER_LABEL_TOKENS: usize = 2;
/// Tokens reported across all units.
pub const GLOBAL_TOP_TOKENS: usize = 10;
pub const LABEL_SEPARATOR: &str = " / ";
pub const FALLBACK_LABEL: &str = "general";

pub struct ThemeClusterAnalyzer {
    threshold: f64,
}

impl Default for ThemeClusterAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_THRESHOLD)
    }
}

impl ThemeClusterAnalyzer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn analyze(&self, scores: &[ThreadScore]) -> ThemeAnalysis {
        let vectors: Vec<SparseVector> = scores.iter().map(vector::unit_vector).collect();
        let mut assigned = vec![false; scores.len()];
        let mut clusters = Vec::new();

        for seed in 0..scores.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;
            let mut members = vec![seed];

            for candidate in (seed + 1)..scores.len() {
                if assigned[candidate] {
                    continue;
                }
                if vector::cosine_similarity(&vectors[seed], &vectors[candidate]) >= self.threshold {
                    assigned[candidate] = true;
                    members.push(candidate);
                }
            }

            let aggregate = vector::sum(members.iter().map(|&i| &vectors[i]));
            let top_tokens = vector::top_tokens(&aggregate, CLUSTER_LABEL_TOKENS);
            clusters.push(ThreadCluster {
                id: format!("theme-{}", clusters.len() + 1),
                label: label_for(&top_tokens),
                members: members.iter().map(|&i| scores[i].clone()).collect(),
                top_tokens,
            });
        }

        let global = vector::sum(vectors.iter());
        let analysis = ThemeAnalysis {
            clusters,
            global_top_tokens: vector::top_tokens(&global, GLOBAL_TOP_TOKENS),
        };

        debug!(
            "Clustered {} units into {} themes",
            scores.len(),
            analysis.clusters.len()
        );
        analysis
    }
}

fn label_for(tokens: &[String]) -> String {
    if tokens.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        tokens.join(LABEL_SEPARATOR)
    }
}
