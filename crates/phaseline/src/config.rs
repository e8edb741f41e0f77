//! Configuration types for phase segmentation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the CLI or any other host.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`SegmenterConfig`] - Phase size bounds used by the segmenter.
//!
//! Size bounds are validated when the configuration is created or
//! deserialised, so an invalid configuration never reaches the segmenter.
//!
//! # Example
//!
//! ```
//! # use phaseline::config::SegmenterConfig;
//! let config = SegmenterConfig::new(8, 2).expect("valid bounds");
//! assert_eq!(config.max_elements_per_phase(), 8);
//!
//! assert!(SegmenterConfig::new(2, 8).is_err());
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Default upper bound on elements per phase.
pub const DEFAULT_MAX_ELEMENTS_PER_PHASE: usize = 10;

/// Default lower bound below which a phase is considered undersized.
pub const DEFAULT_MIN_ELEMENTS_PER_PHASE: usize = 3;

/// Reasons a segmenter configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },

    #[error(
        "min_elements_per_phase ({min}) must not exceed max_elements_per_phase ({max})"
    )]
    MinExceedsMax { min: usize, max: usize },
}

/// Top-level configuration root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Segmentation configuration section.
    #[serde(default)]
    segmenter: SegmenterConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given segmenter settings.
    pub fn new(segmenter: SegmenterConfig) -> Self {
        Self { segmenter }
    }

    /// Returns the segmenter configuration.
    pub fn segmenter(&self) -> SegmenterConfig {
        self.segmenter
    }
}

/// Phase size bounds.
///
/// Invariant: `1 <= min_elements_per_phase <= max_elements_per_phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSegmenterConfig")]
pub struct SegmenterConfig {
    max_elements_per_phase: usize,
    min_elements_per_phase: usize,
}

impl SegmenterConfig {
    /// Creates a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `max_elements_per_phase` - Upper bound on phase size.
    /// * `min_elements_per_phase` - Phases smaller than this are merge candidates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] if either bound is zero and
    /// [`ConfigError::MinExceedsMax`] if the minimum exceeds the maximum.
    pub fn new(
        max_elements_per_phase: usize,
        min_elements_per_phase: usize,
    ) -> Result<Self, ConfigError> {
        if max_elements_per_phase == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_elements_per_phase",
            });
        }
        if min_elements_per_phase == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "min_elements_per_phase",
            });
        }
        if min_elements_per_phase > max_elements_per_phase {
            return Err(ConfigError::MinExceedsMax {
                min: min_elements_per_phase,
                max: max_elements_per_phase,
            });
        }

        Ok(Self {
            max_elements_per_phase,
            min_elements_per_phase,
        })
    }

    pub fn max_elements_per_phase(&self) -> usize {
        self.max_elements_per_phase
    }

    pub fn min_elements_per_phase(&self) -> usize {
        self.min_elements_per_phase
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_elements_per_phase: DEFAULT_MAX_ELEMENTS_PER_PHASE,
            min_elements_per_phase: DEFAULT_MIN_ELEMENTS_PER_PHASE,
        }
    }
}

/// Unvalidated on-disk shape of [`SegmenterConfig`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSegmenterConfig {
    #[serde(default = "default_max")]
    max_elements_per_phase: usize,
    #[serde(default = "default_min")]
    min_elements_per_phase: usize,
}

fn default_max() -> usize {
    DEFAULT_MAX_ELEMENTS_PER_PHASE
}

fn default_min() -> usize {
    DEFAULT_MIN_ELEMENTS_PER_PHASE
}

impl TryFrom<RawSegmenterConfig> for SegmenterConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSegmenterConfig) -> Result<Self, Self::Error> {
        Self::new(raw.max_elements_per_phase, raw.min_elements_per_phase)
    }
}
