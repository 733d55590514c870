//! Brief Summarize — extractive bullet summaries for one discussion unit.
//!
//! Sentences are scored with a TF-IDF variant boosted by topic terms and
//! decision language, then picked with Maximal Marginal Relevance so the
//! bullets do not repeat each other. No model calls; the same input always
//! yields the same summary.

pub mod clean;
pub mod select;
pub mod sentence;
pub mod stemmer;
pub mod summarizer;

pub use summarizer::{
    ExtractiveSummarizer, SummaryMethod, SummaryResult, SummaryTopic, NO_ACTIVITY_SUMMARY,
};
