//! Buffering configuration
//!
//! ```toml
//! window_secs = 86400
//! capacity = 200
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::Deserialize;
use thiserror::Error;

use crate::accumulator::DEFAULT_CAPACITY;
use crate::streamer::DEFAULT_WINDOW_SECS;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Window length is zero or too large to represent
    #[error("window_secs must be between 1 and {max}, got {value}")]
    InvalidWindow { value: u64, max: u64 },
}

/// Window and buffer sizing for a streamer → accumulator chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Window length in seconds
    pub window_secs: u64,

    /// Window batches held before a downstream write; 0 picks the default
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl BufferConfig {
    /// Largest window TimeDelta can hold
    const MAX_WINDOW_SECS: u64 = (i64::MAX / 1_000) as u64;

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        contents.parse()
    }

    /// Window length as a duration
    pub fn window(&self) -> TimeDelta {
        // validate() keeps window_secs within range
        TimeDelta::try_seconds(self.window_secs as i64).unwrap_or(TimeDelta::MAX)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_secs == 0 || self.window_secs > Self::MAX_WINDOW_SECS {
            return Err(ConfigError::InvalidWindow {
                value: self.window_secs,
                max: Self::MAX_WINDOW_SECS,
            });
        }
        Ok(())
    }
}

impl FromStr for BufferConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: BufferConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
