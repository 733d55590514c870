//! Brief Features — group keyword-matched messages into discussion units and
//! extract the signals the scorer consumes.

pub mod extractor;
pub mod signals;
pub mod types;

pub use extractor::FeatureExtractor;
pub use types::{ThreadFeature, TopicHitMetric};
