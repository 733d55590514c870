//! Digest engine: coordinates extraction, scoring, clustering and summaries.

use std::sync::Arc;

use brief_cache::{SummaryCache, TaxonomyCache, TaxonomyLoader};
use brief_core::{ChannelWeights, Clock, EngineConfig, IndexedMessage, Result, Topic};
use brief_features::{FeatureExtractor, ThreadFeature};
use brief_rank::topics::HEADER_TOPICS;
use brief_rank::{top_topics, ScoringService, ThemeClusterAnalyzer, ThreadScore};
use brief_summarize::{ExtractiveSummarizer, SummaryResult, SummaryTopic};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::enhance::SummaryEnhancer;
use crate::types::*;

/// Label used when a unit hit no topic and matched no keyword.
const GENERAL_TOPIC: &str = "general";

/// Top-level engine. Holds configuration and caches; runs share nothing else.
pub struct DigestEngine {
    config: EngineConfig,
    summaries: SummaryCache,
    taxonomy: TaxonomyCache,
    enhancer: Option<Arc<dyn SummaryEnhancer>>,
    summarizer: ExtractiveSummarizer,
}

impl DigestEngine {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let summaries = SummaryCache::new(
            config.summary_cache_capacity,
            config.summary_cache_ttl(),
            clock.clone(),
        );
        let taxonomy = TaxonomyCache::new(config.taxonomy_ttl(), clock);

        info!(
            "Digest engine initialized: summarize_top_units={}, cluster_threshold={}",
            config.summarize_top_units, config.cluster_similarity_threshold
        );

        Self {
            config,
            summaries,
            taxonomy,
            enhancer: None,
            summarizer: ExtractiveSummarizer::new(),
        }
    }

    /// Rewrite extractive summaries through `enhancer`.
    pub fn with_enhancer(mut self, enhancer: Arc<dyn SummaryEnhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evict expired summaries. Meant to be called from the owner's ticker.
    pub fn tick(&self) -> usize {
        let evicted = self.summaries.evict_expired();
        if evicted > 0 {
            debug!("Evicted {} expired summaries", evicted);
        }
        evicted
    }

    /// Run with the taxonomy served from the engine's snapshot cache.
    pub fn run_with_loader(
        &self,
        messages: Vec<IndexedMessage>,
        loader: &dyn TaxonomyLoader,
        channel_weights: ChannelWeights,
        now: DateTime<Utc>,
    ) -> Result<DigestReport> {
        let topics = self.taxonomy.get_or_load(loader)?;
        let request = DigestRequest {
            messages,
            topics: topics.as_ref().clone(),
            channel_weights,
        };
        Ok(self.run(&request, now))
    }

    /// Compute a full digest. Never fails; empty input gives an empty report.
    pub fn run(&self, request: &DigestRequest, now: DateTime<Utc>) -> DigestReport {
        let start = std::time::Instant::now();

        let features =
            FeatureExtractor::new(&self.config, &request.topics).extract(&request.messages);
        let scores = ScoringService::new(&request.channel_weights, now).score_all(features);
        let themes =
            ThemeClusterAnalyzer::new(self.config.cluster_similarity_threshold).analyze(&scores);

        let summaries: Vec<UnitSummary> = scores
            .iter()
            .take(self.config.summarize_top_units)
            .map(|s| self.summarize_unit(s, &request.topics))
            .collect();

        let mut header = DigestHeader::collect(&request.messages, &scores);
        header.cluster_count = themes.clusters.len();
        header.top_topics = top_topics(&scores, HEADER_TOPICS);
        header.global_top_tokens = themes.global_top_tokens.clone();
        header.elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            "Digest complete: messages={}, units={}, clusters={}, summarized={}, duration={}ms",
            header.message_count,
            header.unit_count,
            header.cluster_count,
            summaries.len(),
            header.elapsed_ms
        );

        DigestReport {
            generated_at: now,
            header,
            scores,
            themes,
            summaries,
        }
    }

    fn summarize_unit(&self, score: &ThreadScore, topics: &[Topic]) -> UnitSummary {
        let feature = &score.feature;
        let topic = summary_topic(feature, topics);
        let messages = &feature.messages;

        let summary = match self.summaries.get(&topic, messages) {
            Some(cached) => {
                debug!("Summary cache hit for unit {}", feature.key);
                cached
            }
            None => {
                let draft = self.summarizer.summarize(messages, &topic);
                let result = self.enhance(draft, messages, &topic);
                self.summaries.put(&topic, messages, result.clone());
                result
            }
        };

        UnitSummary {
            key: feature.key.clone(),
            channel_id: feature.channel_id.clone(),
            thread_id: feature.thread_id.clone(),
            topic: topic.label,
            score: score.score,
            summary,
        }
    }

    fn enhance(
        &self,
        draft: SummaryResult,
        messages: &[IndexedMessage],
        topic: &SummaryTopic,
    ) -> SummaryResult {
        let Some(enhancer) = &self.enhancer else {
            return draft;
        };
        if draft.selected_ids.is_empty() {
            return draft;
        }
        match enhancer.enhance(&draft, messages, topic) {
            Ok(Some(enhanced)) => enhanced.apply(&draft),
            Ok(None) => draft,
            Err(e) => {
                warn!(
                    "Summary enhancement failed for topic {}, keeping extractive summary: {}",
                    topic.label, e
                );
                draft
            }
        }
    }
}

/// Heaviest topic of the unit, else its first keyword, else "general".
fn summary_topic(feature: &ThreadFeature, topics: &[Topic]) -> SummaryTopic {
    let heaviest = feature.topic_hits.iter().fold(None::<(&str, f64)>, |best, metric| match best {
        Some((_, w)) if w >= metric.weight() => best,
        _ => Some((metric.slug.as_str(), metric.weight())),
    });

    match heaviest {
        Some((slug, _)) => topics
            .iter()
            .find(|t| t.slug == slug)
            .map(SummaryTopic::from)
            .unwrap_or_else(|| SummaryTopic::from(slug)),
        None => feature
            .keywords
            .iter()
            .next()
            .map(|k| SummaryTopic::from(k.as_str()))
            .unwrap_or_else(|| SummaryTopic::from(GENERAL_TOPIC)),
    }
}
