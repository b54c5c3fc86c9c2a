//! pagediff binary
//!
//! Compares two documents page by page and prints a report.

use anyhow::{Context, Result};
use clap::Parser;
use pagediff_cli::config::Config;
use pagediff_cli::report::OutputFormat;
use pagediff_core::DiffGranularity;
use pagediff_extract::ExtractionStrategy;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pagediff")]
#[command(version, about = "Page-aligned comparison of two documents")]
struct Args {
    /// Original document
    file_a: PathBuf,

    /// Modified document
    file_b: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format: json, text or unified
    #[arg(long)]
    format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pages probed ahead of each cursor
    #[arg(long)]
    lookahead: Option<usize>,

    /// Amount a lookahead probe must beat the current pair by
    #[arg(long)]
    margin: Option<f64>,

    /// Score a lookahead probe must exceed
    #[arg(long)]
    threshold: Option<f64>,

    /// Shortest common block, in tokens, reported as unchanged
    #[arg(long)]
    min_block: Option<usize>,

    /// Diff tokens: word, line or char
    #[arg(long)]
    granularity: Option<DiffGranularity>,

    /// Extraction backend: auto, lopdf, legacy or text
    #[arg(long)]
    extractor: Option<ExtractionStrategy>,

    /// Context lines for the unified format
    #[arg(long)]
    context: Option<usize>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Flags override whatever the config file set
    fn apply(&self, config: &mut Config) {
        if let Some(window) = self.lookahead {
            config.engine.lookahead_window = window;
        }
        if let Some(margin) = self.margin {
            config.engine.insertion_margin = margin;
        }
        if let Some(threshold) = self.threshold {
            config.engine.acceptance_threshold = threshold;
        }
        if let Some(length) = self.min_block {
            config.engine.min_diff_block_length = length;
        }
        if let Some(granularity) = self.granularity {
            config.engine.granularity = granularity;
        }
        if let Some(strategy) = self.extractor {
            config.extraction.strategy = strategy;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(context) = self.context {
            config.output.context_lines = context;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Reports go to stdout, so logs must stay on stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    let report = pagediff_cli::run(&config, &args.file_a, &args.file_b).inspect_err(|e| {
        tracing::error!("Comparison failed: {:#}", e);
    })?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{}", report),
    }

    Ok(())
}
