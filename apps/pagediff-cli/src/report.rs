//! Rendering comparison results
//!
//! # Output Formats
//!
//! - **JSON**: summary, plan and per-pair spans for machine consumption
//! - **Text**: one line per alignment record plus the changed fragments
//! - **Unified**: classic unified diff of the joined document text

use anyhow::Result;
use pagediff_core::{
    AlignmentKind, AlignmentPlan, Comparison, ComparisonSummary, PageSequence, PairDiff, SpanKind,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    #[default]
    Text,
    Unified,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "unified" => Ok(Self::Unified),
            other => Err(format!(
                "Unknown format '{}'. Use: json, text, unified",
                other
            )),
        }
    }
}

/// Input document as named in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,
    pub pages: usize,
    /// Extraction backend that produced the page text
    pub backend: String,
    pub fallback_occurred: bool,
}

/// Everything the JSON report contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub source: DocumentInfo,
    pub target: DocumentInfo,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub summary: ComparisonSummary,
    pub plan: AlignmentPlan,
    pub pairs: Vec<PairDiff>,
}

impl ComparisonReport {
    pub fn new(source: DocumentInfo, target: DocumentInfo, comparison: Comparison) -> Self {
        Self {
            source,
            target,
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: comparison.summary,
            plan: comparison.plan,
            pairs: comparison.pairs,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable listing, labelled the way reviewers read page reports
    pub fn to_text(&self, a: &PageSequence, b: &PageSequence) -> Result<String> {
        let mut out = String::new();
        self.write_text(&mut out, a, b)?;
        Ok(out)
    }

    fn write_text(&self, out: &mut impl Write, a: &PageSequence, b: &PageSequence) -> fmt::Result {
        writeln!(
            out,
            "Comparing {} ({} pages) with {} ({} pages)",
            self.source.name, self.source.pages, self.target.name, self.target.pages
        )?;
        writeln!(out)?;

        let mut pairs = self.pairs.iter();
        for record in self.plan.iter() {
            match (record.kind, record.source_index, record.target_index) {
                (AlignmentKind::Inserted, _, Some(t)) => {
                    writeln!(out, "Added - Page {}", t + 1)?;
                }
                (AlignmentKind::Deleted, Some(s), _) => {
                    writeln!(out, "Missing - Page {}", s + 1)?;
                }
                (AlignmentKind::Matched, Some(s), Some(t)) => {
                    write!(
                        out,
                        "Original - Page {} <-> Modified - Page {} (similarity {:.3})",
                        s + 1,
                        t + 1,
                        record.similarity.unwrap_or(0.0)
                    )?;
                    if record.is_shifted() {
                        write!(out, " (Page Shifted)")?;
                    }
                    writeln!(out)?;

                    if let Some(pair) = pairs.next() {
                        write_fragments(out, pair, a, b)?;
                    }
                }
                _ => {}
            }
        }

        writeln!(out)?;
        let summary = &self.summary;
        if summary.identical {
            writeln!(out, "No differences found.")
        } else {
            writeln!(
                out,
                "Summary: {} matched, {} added, {} missing, {} shifted, {} changed",
                summary.matched,
                summary.inserted,
                summary.deleted,
                summary.shifted,
                summary.changed_pairs
            )
        }
    }
}

fn write_fragments(
    out: &mut impl Write,
    pair: &PairDiff,
    a: &PageSequence,
    b: &PageSequence,
) -> fmt::Result {
    let source = a.get(pair.source_index).map_or("", |p| p.text.as_str());
    let target = b.get(pair.target_index).map_or("", |p| p.text.as_str());

    for span in &pair.spans {
        match span.kind {
            SpanKind::Equal => {}
            SpanKind::Delete => {
                writeln!(out, "    - {:?}", span.source_text(source).unwrap_or(""))?;
            }
            SpanKind::Insert => {
                writeln!(out, "    + {:?}", span.target_text(target).unwrap_or(""))?;
            }
        }
    }
    Ok(())
}

/// Unified diff lines as one newline-terminated string
pub fn render_unified(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
