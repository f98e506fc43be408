//! Error types for the main colors picker

use std::fmt;

use thiserror::Error;

use crate::color::Channel;

/// Why a requested variety level was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarietyLevelIssue {
    NotInteger,
    OutOfRange,
}

impl fmt::Display for VarietyLevelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarietyLevelIssue::NotInteger => f.write_str("must be an integer"),
            VarietyLevelIssue::OutOfRange => f.write_str("out of range (expected 1..=256)"),
        }
    }
}

/// Errors returned by [`pick_main_colors`](crate::pick_main_colors).
///
/// Every variant describes bad caller input; nothing here is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickerError {
    /// The color list was empty
    #[error("no colors provided")]
    EmptyInput,

    /// The variety level is fractional or outside 1..=256
    #[error("variety level {issue}, got {value}")]
    InvalidVarietyLevel { value: f64, issue: VarietyLevelIssue },

    /// A channel rounds to something outside 0..=255
    #[error("sub-pixel out of range: color #{index} has {channel} = {value}")]
    InvalidSubPixel {
        index: usize,
        channel: Channel,
        value: f64,
    },
}

/// Result type alias for picker operations
pub type Result<T> = std::result::Result<T, PickerError>;
