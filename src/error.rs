/*
 * Error Module
 *
 * Errors raised while building a flock. A running flock never fails:
 * everything that could go wrong is rejected once, at construction.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when configuring or constructing a flock.
#[derive(Debug, Error)]
pub enum FlockError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for `FlockConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl FlockError {
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, FlockError::InvalidConfig(_))
    }
}
