//! Picker configuration.
//!
//! [`PickerOptions`] mirrors the option object JavaScript callers pass to
//! `getMainColors`, and serializes with the same camelCase names:
//!
//! ```
//! use main_colors_picker::{PickerOptions, SelectionMode};
//!
//! let options: PickerOptions =
//!     serde_json::from_str(r#"{ "colorsVarietyLevel": 16, "mode": "frequency" }"#)?;
//! assert_eq!(options, PickerOptions::new().with_variety_level(16).with_mode(SelectionMode::Frequency));
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! The variety level is stored as it was given and only checked when a pick
//! runs, so a fractional or out-of-range level surfaces as a
//! [`PickerError`] from the pick itself.

use serde::{Deserialize, Serialize};

use crate::error::{PickerError, Result, VarietyLevelIssue};

/// How a bucket is reduced to a single color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Per-channel mean of every color in the bucket.
    #[default]
    Average,
    /// The color that appears most often in the bucket.
    Frequency,
}

/// Options accepted by [`pick_main_colors`](crate::pick_main_colors).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerOptions {
    /// Number of groups each channel is split into, 1..=256. At most this
    /// number cubed colors are returned. Defaults to 8 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors_variety_level: Option<f64>,

    #[serde(default)]
    pub mode: SelectionMode,
}

impl PickerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variety_level(mut self, level: u16) -> Self {
        self.colors_variety_level = Some(f64::from(level));
        self
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// The validated variety level, or the default when none was given.
    pub fn variety_level(&self) -> Result<VarietyLevel> {
        match self.colors_variety_level {
            Some(level) => VarietyLevel::try_from(level),
            None => Ok(VarietyLevel::default()),
        }
    }
}

/// A variety level known to be within 1..=256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarietyLevel(u16);

impl VarietyLevel {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 256;
    pub const DEFAULT: u16 = 8;

    pub fn new(level: u16) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(PickerError::InvalidVarietyLevel {
                value: f64::from(level),
                issue: VarietyLevelIssue::OutOfRange,
            })
        }
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for VarietyLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for VarietyLevel {
    type Error = PickerError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(PickerError::InvalidVarietyLevel {
                value,
                issue: VarietyLevelIssue::NotInteger,
            });
        }
        if value < f64::from(Self::MIN) || value > f64::from(Self::MAX) {
            return Err(PickerError::InvalidVarietyLevel {
                value,
                issue: VarietyLevelIssue::OutOfRange,
            });
        }
        Ok(Self(value as u16))
    }
}
