//! Brief Core — message model, topic taxonomy, configuration, clocks.

pub mod clock;
pub mod config;
pub mod error;
pub mod model;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use model::{ChannelWeights, IndexedMessage, Reaction, Topic};
