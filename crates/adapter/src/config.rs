//! Runtime configuration from environment variables
//!
//! - `TWENTY48_SEED`: RNG seed (default: derived from the clock)
//! - `TWENTY48_TICK_MS`: tick period in ms, `0` runs unpaced (default: 16)
//! - `TWENTY48_FOUR_PERCENT`: chance in percent that a spawn is a 4 (default: 10)
//!
//! Unparseable values fall back to the default.

use std::time::Duration;

use crate::core::SpawnPolicy;
use crate::types::{DEFAULT_FOUR_PERCENT, TICK_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub seed: u32,
    pub tick_ms: u32,
    pub four_percent: u8,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            tick_ms: TICK_MS,
            four_percent: DEFAULT_FOUR_PERCENT,
        }
    }
}

impl AdapterConfig {
    /// Fixed seed, default pacing and weighting
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            tick_ms: TICK_MS,
            four_percent: DEFAULT_FOUR_PERCENT,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup (the environment in production)
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = lookup("TWENTY48_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let tick_ms = lookup("TWENTY48_TICK_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(TICK_MS);

        let four_percent = lookup("TWENTY48_FOUR_PERCENT")
            .and_then(|s| s.trim().parse::<u8>().ok())
            .filter(|p| *p <= 100)
            .unwrap_or(DEFAULT_FOUR_PERCENT);

        Self {
            seed,
            tick_ms,
            four_percent,
        }
    }

    pub fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::new(self.four_percent)
    }

    /// Tick period, `None` when unpaced
    pub fn tick_duration(&self) -> Option<Duration> {
        (self.tick_ms > 0).then(|| Duration::from_millis(self.tick_ms as u64))
    }
}

fn clock_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    nanos.max(1)
}
