//! Group tracking configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::{DEFAULT_MIN_GROUP_SIZE, DEFAULT_TIMEOUT_MS, MOTES_PER_GROUP};

/// Configuration for a [`GroupEngine`](crate::GroupEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupsConfig {
    /// Number of motes in the deployment; sizes the store.
    pub num_motes: usize,

    /// A member silent for at least this long is expired by the sweep.
    pub timeout_threshold: Duration,

    /// Groups with fewer members are dismantled.
    pub minimum_viable_size: usize,

    /// How often the sweep runs. Only read by whoever drives [`tick`](crate::GroupEngine::tick).
    pub sweep_interval: Duration,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            num_motes: 8,
            timeout_threshold: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            minimum_viable_size: DEFAULT_MIN_GROUP_SIZE,
            sweep_interval: Duration::from_secs(10),
        }
    }
}

impl GroupsConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// - `MOTENET_NUM_MOTES`
    /// - `MOTENET_TIMEOUT_MS`
    /// - `MOTENET_MIN_GROUP_SIZE`
    /// - `MOTENET_SWEEP_INTERVAL_MS`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            num_motes: env_or("MOTENET_NUM_MOTES", defaults.num_motes)?,
            timeout_threshold: env_millis_or("MOTENET_TIMEOUT_MS", defaults.timeout_threshold)?,
            minimum_viable_size: env_or("MOTENET_MIN_GROUP_SIZE", defaults.minimum_viable_size)?,
            sweep_interval: env_millis_or("MOTENET_SWEEP_INTERVAL_MS", defaults.sweep_interval)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of group slots: `floor(num_motes / 3)`.
    pub fn num_groups(&self) -> usize {
        self.num_motes / MOTES_PER_GROUP
    }

    /// Timeout in milliseconds, as compared against timestamps.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_threshold.as_millis() as u64
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.num_groups() == 0 {
            return Err(Error::InvalidConfig(format!(
                "num_motes = {} gives no group slots (need at least {})",
                self.num_motes, MOTES_PER_GROUP
            )));
        }
        if u32::try_from(self.num_groups()).is_err() {
            return Err(Error::InvalidConfig(format!(
                "num_motes = {} gives more group slots than ids",
                self.num_motes
            )));
        }
        if self.minimum_viable_size == 0 {
            return Err(Error::InvalidConfig(
                "minimum_viable_size must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "sweep_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_num_motes(mut self, num_motes: usize) -> Self {
        self.num_motes = num_motes;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_threshold = timeout;
        self
    }

    #[must_use]
    pub fn with_minimum_viable_size(mut self, size: usize) -> Self {
        self.minimum_viable_size = size;
        self
    }

    #[must_use]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("{name}={raw:?} is not a valid number"))),
        Err(_) => Ok(default),
    }
}

fn env_millis_or(name: &str, default: Duration) -> Result<Duration> {
    env_or(name, default.as_millis() as u64).map(Duration::from_millis)
}
