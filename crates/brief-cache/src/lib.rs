//! Brief Cache — TTL caches whose expiry is measured by an injected clock.
//!
//! Nothing here schedules its own eviction. Owners call `evict_expired` from
//! whatever ticker they run, and tests drive time with `ManualClock`.

pub mod summary;
pub mod taxonomy;
pub mod ttl;

pub use summary::{summary_key, SummaryCache};
pub use taxonomy::{StaticTaxonomy, TaxonomyCache, TaxonomyLoader};
pub use ttl::TtlCache;
