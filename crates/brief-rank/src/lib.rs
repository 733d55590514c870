//! Brief Rank — turn discussion-unit features into ranked scores, theme
//! clusters and topic counts.
//!
//! Scoring is a fixed weighted formula; clustering is a single greedy pass
//! over sparse token vectors. Both are heuristics meant to be explainable,
//! not optimal.

pub mod scoring;
pub mod themes;
pub mod topics;
pub mod types;
pub mod vector;

pub use scoring::ScoringService;
pub use themes::ThemeClusterAnalyzer;
pub use topics::top_topics;
pub use types::*;
