//! Configuration file for the `pagediff` command
//!
//! Every section is optional; missing values fall back to the engine and
//! output defaults. Command-line flags are applied on top afterwards.

use anyhow::Context;
use pagediff_core::EngineConfig;
use pagediff_extract::ExtractionStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::report::OutputFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Alignment and diff tuning
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use pagediff_cli::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_str(r#"
    ///     [engine]
    ///     lookahead_window = 5
    /// "#)?;
    /// assert_eq!(config.engine.lookahead_window, 5);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub strategy: ExtractionStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format (default: text)
    #[serde(default)]
    pub format: OutputFormat,
    /// Unchanged lines around each unified diff hunk (default: 3)
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
}

fn default_context_lines() -> usize {
    3
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            context_lines: default_context_lines(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagediff_core::DiffGranularity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.context_lines, 3);
        assert_eq!(config.extraction.strategy, ExtractionStrategy::Auto);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_str(
            r#"
            [engine]
            lookahead_window = 4
            insertion_margin = 0.1
            acceptance_threshold = 0.6
            min_diff_block_length = 2
            granularity = "line"

            [extraction]
            strategy = "legacy"

            [output]
            format = "unified"
            context_lines = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.lookahead_window, 4);
        assert_eq!(config.engine.acceptance_threshold, 0.6);
        assert_eq!(config.engine.granularity, DiffGranularity::Line);
        assert_eq!(config.extraction.strategy, ExtractionStrategy::Legacy);
        assert_eq!(config.output.format, OutputFormat::Unified);
        assert_eq!(config.output.context_lines, 5);
    }

    #[test]
    fn test_malformed_toml() {
        let err = Config::from_str("[engine\nlookahead_window = ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/pagediff.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
