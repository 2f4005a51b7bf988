//! # City Error Types
//!
//! All errors that can occur while configuring or streaming the city.
//!
//! Degenerate lane widths and empty placement ranges are NOT errors:
//! the planner clamps them to [`crate::MIN_VIABLE_EXTENT`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::CityConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value the generator cannot work with at all.
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by the chunk manager.
#[derive(Error, Debug)]
pub enum CityError {
    /// Configuration rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Player position was NaN or infinite.
    #[error("player position is not finite: z = {0}")]
    NonFinitePosition(f32),

    /// Player position is finite but its window does not fit in the
    /// chunk index range.
    #[error("player position out of range: z = {0}")]
    PositionOutOfRange(f32),

    /// `advance` called before `initialize`.
    #[error("chunk manager used before initialize")]
    NotInitialized,
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for city operations.
pub type CityResult<T> = Result<T, CityError>;
