//! Seam for an optional external rewrite of extractive summaries.

use brief_core::{IndexedMessage, Result};
use brief_summarize::{SummaryMethod, SummaryResult, SummaryTopic};

/// Replacement text and what producing it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedSummary {
    pub text: String,
    pub tokens_in: u32,
    pub tokens_out: u32,
    pub cost_usd: f64,
}

impl EnhancedSummary {
    /// Apply to a draft, keeping the draft's source message ids.
    pub fn apply(self, draft: &SummaryResult) -> SummaryResult {
        SummaryResult {
            summary: self.text,
            selected_ids: draft.selected_ids.clone(),
            tokens_in: self.tokens_in,
            tokens_out: self.tokens_out,
            cost_usd: self.cost_usd,
            method: SummaryMethod::Enhanced,
        }
    }
}

/// Rewrites a draft summary, typically with a language model.
///
/// `Ok(None)` keeps the draft. Errors are logged by the engine and the draft
/// is kept; they never fail the digest.
pub trait SummaryEnhancer: Send + Sync {
    fn enhance(
        &self,
        draft: &SummaryResult,
        messages: &[IndexedMessage],
        topic: &SummaryTopic,
    ) -> Result<Option<EnhancedSummary>>;
}
