//! Error types for the fallible setup surface.
//!
//! The simulation itself never fails: invalid commands are silent no-ops.
//! Only match setup (registering players) and scenario loading can fail.

use thiserror::Error;

/// Errors raised while setting up a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Players must belong to a playable team.
    #[error("player '{0}' cannot join the neutral team")]
    NeutralPlayer(String),
}

/// Errors raised while loading a scenario configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The scenario file could not be read.
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    /// The scenario is not valid JSON or does not match the schema.
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    /// A building level outside 0..=3.
    #[error("invalid building level {0} (expected 0..=3)")]
    InvalidLevel(u8),

    /// A placement coordinate is NaN or infinite.
    #[error("building {index} has a non-finite position")]
    NonFinitePosition {
        /// Index of the offending placement in the scenario list.
        index: usize,
    },
}
