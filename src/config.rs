//! Client configuration for the `pollenflug` crate
//!
//! Plain options struct with validated defaults; the library has no config
//! file of its own, callers override fields as needed.

use std::path::PathBuf;
use std::time::Duration;

/// Default DWD open data endpoint for the pollen load report
pub const DWD_URL: &str =
    "https://opendata.dwd.de/climate_environment/health/alerts/s31fg.json";

/// How long a cache snapshot stays usable (1 hour)
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(3600);

/// Request timeout for a single fetch attempt
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of fetch attempts before the blocking client gives up
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Fixed delay between fetch attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Options for [`crate::PollenApi`] and [`crate::AsyncPollenApi`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Endpoint serving the pollen load report
    pub url: String,
    /// Request timeout for a single fetch attempt
    pub timeout: Duration,
    /// Number of fetch attempts (blocking client only)
    pub retry_count: u32,
    /// Fixed delay between fetch attempts (blocking client only)
    pub retry_delay: Duration,
    /// Wall-clock age after which a cache snapshot is stale
    pub cache_duration: Duration,
    /// Snapshot file location; `None` resolves to the per-user cache directory
    pub cache_path: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            url: DWD_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
            cache_duration: DEFAULT_CACHE_DURATION,
            cache_path: None,
        }
    }
}

impl ClientOptions {
    /// Options with the cache window replaced
    #[must_use]
    pub fn with_cache_duration(mut self, cache_duration: Duration) -> Self {
        self.cache_duration = cache_duration;
        self
    }

    /// Options with the snapshot file pinned to a specific path
    #[must_use]
    pub fn with_cache_path(mut self, cache_path: PathBuf) -> Self {
        self.cache_path = Some(cache_path);
        self
    }

    /// Options with the retry policy replaced
    #[must_use]
    pub fn with_retry(mut self, retry_count: u32, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self
    }
}
