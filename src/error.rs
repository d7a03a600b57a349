//! Error types for the fallible edges of the crate.
//!
//! The simulation step itself never fails; these cover loading configuration,
//! resolving an upgrade selection and folding meta-progression.

use thiserror::Error;

use crate::sim::UpgradeId;

/// Errors produced while loading or validating a [`crate::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("world dimensions must be positive (got {width}x{height})")]
    WorldSize { width: f32, height: f32 },

    #[error("frame rate must be positive")]
    FrameRate,

    #[error("stage duration must be at least one second")]
    Duration,

    #[error("experience growth factor must exceed 1.0 (got {0})")]
    GrowthFactor(f32),

    #[error("first experience threshold must be at least 2 (got {0})")]
    FirstThreshold(u32),

    #[error("capacity `{0}` must be non-zero")]
    ZeroCapacity(&'static str),

    #[error("probability `{name}` must be within [0, 1] (got {value})")]
    Probability { name: &'static str, value: f32 },
}

/// Errors produced when applying an upgrade choice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no upgrade selection is pending")]
    NotLevelingUp,

    #[error("upgrade {0:?} was not offered")]
    NotOffered(UpgradeId),
}

/// Errors produced by the meta-progression helpers.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("profile parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("not enough coins: need {need}, have {have}")]
    InsufficientCoins { need: u64, have: u64 },
}
