//! Library side of the `pagediff` command
//!
//! `main.rs` only parses flags and sets up logging; everything that touches
//! documents lives here so it can be exercised from tests.

pub mod config;
pub mod report;

use anyhow::{bail, Context, Result};
use pagediff_core::PageDiffEngine;
use pagediff_extract::{Extraction, ExtractionRouter};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::report::{render_unified, ComparisonReport, DocumentInfo, OutputFormat};

/// Compare two files and render the report selected in `config`
pub fn run(config: &Config, file_a: &Path, file_b: &Path) -> Result<String> {
    for path in [file_a, file_b] {
        if !path.exists() {
            bail!("Input file not found: {}", path.display());
        }
    }

    let engine =
        PageDiffEngine::new(config.engine.clone()).context("Invalid engine configuration")?;
    let router = ExtractionRouter::new(config.extraction.strategy);

    let a = extract(&router, file_a)?;
    let b = extract(&router, file_b)?;

    if config.output.format == OutputFormat::Unified {
        let lines = engine.unified_diff(&a.pages, &b.pages, config.output.context_lines);
        return Ok(render_unified(&lines));
    }

    let comparison = engine.compare(&a.pages, &b.pages);
    info!(
        "Compared {} and {} pages: {} matched, {} added, {} missing",
        a.pages.len(),
        b.pages.len(),
        comparison.summary.matched,
        comparison.summary.inserted,
        comparison.summary.deleted
    );

    let report = ComparisonReport::new(
        document_info(file_a, &a),
        document_info(file_b, &b),
        comparison,
    );

    match config.output.format {
        OutputFormat::Json => report.to_json(),
        _ => report.to_text(&a.pages, &b.pages),
    }
}

fn extract(router: &ExtractionRouter, path: &Path) -> Result<Extraction> {
    let extraction = router
        .extract_file(path)
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;
    info!(
        "Extracted {} pages from {} using {}",
        extraction.pages.len(),
        path.display(),
        extraction.backend
    );
    Ok(extraction)
}

fn document_info(path: &Path, extraction: &Extraction) -> DocumentInfo {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    DocumentInfo {
        name,
        pages: extraction.pages.len(),
        backend: extraction.backend.clone(),
        fallback_occurred: extraction.fallback_occurred,
    }
}
