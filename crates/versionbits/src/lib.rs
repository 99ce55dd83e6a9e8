//! BIP9 versionbits deployment tracking for IoP networks.

pub mod cache;
pub mod error;
pub mod evaluate;
pub mod headers;
pub mod state;

pub use cache::{StateCache, DEFAULT_STATE_CACHE_ENTRIES};
pub use error::VersionBitsError;
pub use evaluate::{BitStatistics, VersionBits};
pub use headers::{HeaderInfo, HeaderLookup, LookupError, MemoryHeaders};
pub use state::ThresholdState;
