//! Engine configuration
//!
//! Every threshold the engine consumes lives here. Values are checked once,
//! when the configuration is built or handed to the engine, so the algorithms
//! never have to re-validate mid-run.

use crate::error::PageDiffError;
use serde::{Deserialize, Serialize};

/// Token granularity used by the per-page differ
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiffGranularity {
    /// Runs of non-whitespace and runs of whitespace
    #[default]
    Word,
    /// Lines, including their terminator
    Line,
    /// Individual Unicode scalar values
    Char,
}

impl std::str::FromStr for DiffGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "line" => Ok(Self::Line),
            "char" => Ok(Self::Char),
            other => Err(format!(
                "Unknown granularity '{}'. Use: word, line, char",
                other
            )),
        }
    }
}

/// Largest accepted `lookahead_window`
pub const MAX_LOOKAHEAD_WINDOW: usize = 256;

/// Tunable constants for alignment and differencing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pages probed ahead of each cursor (default: 3)
    #[serde(default = "default_lookahead_window")]
    pub lookahead_window: usize,
    /// Amount a lookahead probe must beat the current pair by (default: 0.05)
    #[serde(default = "default_insertion_margin")]
    pub insertion_margin: f64,
    /// Absolute score a lookahead probe must exceed (default: 0.5)
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,
    /// Shortest common block, in tokens, reported as EQUAL (default: 1)
    #[serde(default = "default_min_diff_block_length")]
    pub min_diff_block_length: usize,
    /// Tokenization used by the differ
    #[serde(default)]
    pub granularity: DiffGranularity,
    /// How many times a window may slide past its own width (default: 1);
    /// `None` means until the end of the document
    #[serde(default = "default_max_window_extensions")]
    pub max_window_extensions: Option<usize>,
}

fn default_lookahead_window() -> usize {
    3
}

fn default_insertion_margin() -> f64 {
    0.05
}

fn default_acceptance_threshold() -> f64 {
    0.5
}

fn default_min_diff_block_length() -> usize {
    1
}

fn default_max_window_extensions() -> Option<usize> {
    Some(1)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead_window: default_lookahead_window(),
            insertion_margin: default_insertion_margin(),
            acceptance_threshold: default_acceptance_threshold(),
            min_diff_block_length: default_min_diff_block_length(),
            granularity: DiffGranularity::default(),
            max_window_extensions: default_max_window_extensions(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Reject out-of-range values
    ///
    /// # Errors
    ///
    /// Returns `PageDiffError::InvalidConfig` if:
    /// - `lookahead_window` exceeds [`MAX_LOOKAHEAD_WINDOW`]
    /// - `acceptance_threshold` is not a finite value in `[0, 1]`
    /// - `insertion_margin` is negative or not finite
    /// - `min_diff_block_length` is zero
    /// - `max_window_extensions` is `Some(0)`
    pub fn validate(&self) -> Result<(), PageDiffError> {
        if self.lookahead_window > MAX_LOOKAHEAD_WINDOW {
            return Err(PageDiffError::InvalidConfig(format!(
                "lookahead_window must be <= {}, got {}",
                MAX_LOOKAHEAD_WINDOW, self.lookahead_window
            )));
        }

        if !self.acceptance_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.acceptance_threshold)
        {
            return Err(PageDiffError::InvalidConfig(format!(
                "acceptance_threshold must be within [0, 1], got {}",
                self.acceptance_threshold
            )));
        }

        if !self.insertion_margin.is_finite() || self.insertion_margin < 0.0 {
            return Err(PageDiffError::InvalidConfig(format!(
                "insertion_margin must be a finite value >= 0, got {}",
                self.insertion_margin
            )));
        }

        if self.min_diff_block_length == 0 {
            return Err(PageDiffError::InvalidConfig(
                "min_diff_block_length must be >= 1".into(),
            ));
        }

        if self.max_window_extensions == Some(0) {
            return Err(PageDiffError::InvalidConfig(
                "max_window_extensions must be >= 1 when set".into(),
            ));
        }

        Ok(())
    }
}

/// Builder that validates on `build`
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn lookahead_window(mut self, window: usize) -> Self {
        self.config.lookahead_window = window;
        self
    }

    pub fn insertion_margin(mut self, margin: f64) -> Self {
        self.config.insertion_margin = margin;
        self
    }

    pub fn acceptance_threshold(mut self, threshold: f64) -> Self {
        self.config.acceptance_threshold = threshold;
        self
    }

    pub fn min_diff_block_length(mut self, length: usize) -> Self {
        self.config.min_diff_block_length = length;
        self
    }

    pub fn granularity(mut self, granularity: DiffGranularity) -> Self {
        self.config.granularity = granularity;
        self
    }

    pub fn max_window_extensions(mut self, limit: Option<usize>) -> Self {
        self.config.max_window_extensions = limit;
        self
    }

    pub fn build(self) -> Result<EngineConfig, PageDiffError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
