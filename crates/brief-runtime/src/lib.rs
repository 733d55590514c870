//! Brief Runtime — the digest engine that wires every stage together.

pub mod engine;
pub mod enhance;
pub mod types;

pub use engine::DigestEngine;
pub use enhance::{EnhancedSummary, SummaryEnhancer};
pub use types::*;
