//! Route builder configuration.

use chrono::Duration;
use serde::Deserialize;

use crate::cache::CacheConfig;

/// Longest transfer window a configuration may ask for.
pub const MAX_TRANSFER_WINDOW_SECS: i64 = 31 * 86_400;

/// A configuration the route builder refuses to run with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("transfer times can not be negative, got min = {min}, max = {max}")]
    NegativeTransferTime { min: i64, max: i64 },

    #[error("min transfer time {min}s exceeds max transfer time {max}s")]
    InvertedTransferWindow { min: i64, max: i64 },

    #[error("transfer window of {0}s exceeds the limit of {limit}s", limit = MAX_TRANSFER_WINDOW_SECS)]
    TransferWindowTooLong(i64),
}

/// Configuration parameters for route building.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouteBuilderConfig {
    /// Maximum number of run changes, whatever the caller asks for.
    pub max_transfers: usize,

    /// Minimum time between arriving at a point and boarding the next run
    /// (seconds).
    pub min_transfer_secs: i64,

    /// Maximum time spent waiting for the next run (seconds).
    pub max_transfer_secs: i64,

    /// Number of in-progress searches kept for paging. Zero disables.
    pub max_cache_size: u64,

    /// How long an in-progress search is kept (seconds).
    pub request_ttl_secs: u64,

    /// Largest result count a caller may request when transfers are allowed.
    pub max_results: usize,
}

impl RouteBuilderConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_transfers: usize,
        min_transfer_secs: i64,
        max_transfer_secs: i64,
        max_cache_size: u64,
        max_results: usize,
    ) -> Self {
        Self {
            max_transfers,
            min_transfer_secs,
            max_transfer_secs,
            max_cache_size,
            max_results,
            ..Self::default()
        }
    }

    /// Checks the transfer window is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_transfer_secs, self.max_transfer_secs);
        if min < 0 || max < 0 {
            return Err(ConfigError::NegativeTransferTime { min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedTransferWindow { min, max });
        }
        if max > MAX_TRANSFER_WINDOW_SECS {
            return Err(ConfigError::TransferWindowTooLong(max));
        }
        Ok(())
    }

    /// Returns the minimum transfer time as a Duration, clamped to
    /// `[0, MAX_TRANSFER_WINDOW_SECS]`.
    pub fn min_transfer(&self) -> Duration {
        clamped_seconds(self.min_transfer_secs)
    }

    /// Returns the maximum transfer time as a Duration, clamped like
    /// [`min_transfer`](Self::min_transfer).
    pub fn max_transfer(&self) -> Duration {
        clamped_seconds(self.max_transfer_secs)
    }

    /// Request cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: std::time::Duration::from_secs(self.request_ttl_secs),
            max_capacity: self.max_cache_size,
        }
    }
}

fn clamped_seconds(secs: i64) -> Duration {
    Duration::try_seconds(secs.clamp(0, MAX_TRANSFER_WINDOW_SECS)).unwrap_or_default()
}

impl Default for RouteBuilderConfig {
    fn default() -> Self {
        Self {
            max_transfers: 3,
            min_transfer_secs: 1800,  // 30 minutes
            max_transfer_secs: 86400, // 1 day
            max_cache_size: 5,
            request_ttl_secs: 300,
            max_results: 500,
        }
    }
}
