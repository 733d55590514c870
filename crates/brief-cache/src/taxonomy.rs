//! Topic taxonomy snapshot with clock-driven refresh.

use std::sync::Arc;

use brief_core::{Clock, Result, Topic};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Source of the topic taxonomy (database, config file, fixture).
pub trait TaxonomyLoader: Send + Sync {
    fn load(&self) -> Result<Vec<Topic>>;
}

/// Loader over a fixed topic list.
#[derive(Debug, Clone, Default)]
pub struct StaticTaxonomy(pub Vec<Topic>);

impl TaxonomyLoader for StaticTaxonomy {
    fn load(&self) -> Result<Vec<Topic>> {
        Ok(self.0.clone())
    }
}

struct Snapshot {
    topics: Arc<Vec<Topic>>,
    loaded_at: DateTime<Utc>,
}

/// Holds the last loaded taxonomy and reloads it once the TTL lapses.
pub struct TaxonomyCache {
    snapshot: Mutex<Option<Snapshot>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TaxonomyCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshot: Mutex::new(None),
            ttl,
            clock,
        }
    }

    /// Current snapshot, reloading through `loader` when missing or stale.
    ///
    /// A failed reload keeps serving the stale snapshot if there is one.
    pub fn get_or_load(&self, loader: &dyn TaxonomyLoader) -> Result<Arc<Vec<Topic>>> {
        let now = self.clock.now();
        let mut snapshot = self.snapshot.lock();

        if let Some(current) = snapshot.as_ref() {
            if now - current.loaded_at < self.ttl {
                return Ok(current.topics.clone());
            }
        }

        match loader.load() {
            Ok(topics) => {
                info!("Loaded taxonomy snapshot: {} topics", topics.len());
                let topics = Arc::new(topics);
                *snapshot = Some(Snapshot {
                    topics: topics.clone(),
                    loaded_at: now,
                });
                Ok(topics)
            }
            Err(e) => match snapshot.as_ref() {
                Some(stale) => {
                    warn!("Taxonomy reload failed, serving stale snapshot: {}", e);
                    Ok(stale.topics.clone())
                }
                None => Err(e),
            },
        }
    }

    /// Force the next `get_or_load` to reload.
    pub fn invalidate(&self) {
        *self.snapshot.lock() = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.lock().is_some()
    }
}
