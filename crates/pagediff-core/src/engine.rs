//! Comparison engine
//!
//! Ties the planner and the differ together behind one validated
//! configuration. The engine holds no per-run state, so one instance can
//! serve any number of comparisons, including concurrent ones.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::{AlignmentKind, AlignmentPlan, AlignmentPlanner};
use crate::config::EngineConfig;
use crate::differ::{DiffSpan, PageDiffer, PairDiff};
use crate::error::PageDiffError;
use crate::page::PageSequence;
use crate::similarity::{RatioScorer, SimilarityScorer};
use crate::unified::{unified_document_diff, DEFAULT_FROM_LABEL, DEFAULT_TO_LABEL};

/// Counts describing a finished comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub source_pages: usize,
    pub target_pages: usize,
    pub matched: usize,
    pub inserted: usize,
    pub deleted: usize,
    /// MATCHED pairs whose page numbers differ
    pub shifted: usize,
    /// MATCHED pairs with at least one DELETE or INSERT span
    pub changed_pairs: usize,
    /// No inserted or deleted pages and no changed text
    pub identical: bool,
}

impl ComparisonSummary {
    fn new(
        source_pages: usize,
        target_pages: usize,
        plan: &AlignmentPlan,
        pairs: &[PairDiff],
    ) -> Self {
        let inserted = plan.count(AlignmentKind::Inserted);
        let deleted = plan.count(AlignmentKind::Deleted);
        let changed_pairs = pairs.iter().filter(|p| p.has_changes()).count();

        Self {
            source_pages,
            target_pages,
            matched: plan.count(AlignmentKind::Matched),
            inserted,
            deleted,
            shifted: plan.shifted_count(),
            changed_pairs,
            identical: inserted == 0 && deleted == 0 && changed_pairs == 0,
        }
    }
}

/// Full result: the alignment plan plus a diff for every MATCHED pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub plan: AlignmentPlan,
    pub pairs: Vec<PairDiff>,
    pub summary: ComparisonSummary,
}

pub struct PageDiffEngine<S = RatioScorer> {
    config: EngineConfig,
    scorer: S,
}

impl PageDiffEngine<RatioScorer> {
    /// Create an engine with the default similarity measure
    ///
    /// # Errors
    ///
    /// Returns `PageDiffError::InvalidConfig` if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, PageDiffError> {
        Self::with_scorer(config, RatioScorer::new())
    }
}

impl Default for PageDiffEngine<RatioScorer> {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            scorer: RatioScorer::new(),
        }
    }
}

impl<S: SimilarityScorer> PageDiffEngine<S> {
    /// Create an engine with a custom similarity measure
    ///
    /// # Errors
    ///
    /// Returns `PageDiffError::InvalidConfig` if `config` fails validation.
    pub fn with_scorer(config: EngineConfig, scorer: S) -> Result<Self, PageDiffError> {
        config.validate()?;
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn align(&self, a: &PageSequence, b: &PageSequence) -> AlignmentPlan {
        AlignmentPlanner::new(&self.config, &self.scorer).plan(a, b)
    }

    /// Spans for one page pair
    pub fn diff_pair(&self, source: &str, target: &str) -> Vec<DiffSpan> {
        PageDiffer::new(&self.config).diff(source, target)
    }

    pub fn compare(&self, a: &PageSequence, b: &PageSequence) -> Comparison {
        let plan = self.align(a, b);
        let pairs: Vec<PairDiff> = self.pair_diffs(a, b, &plan).collect();
        self.finish(a, b, plan, pairs)
    }

    /// Compare two documents, checking `cancel` between alignment steps and
    /// after each pair diff
    ///
    /// # Errors
    ///
    /// Returns `PageDiffError::Cancelled` once `cancel` is observed set.
    pub fn compare_with_cancel(
        &self,
        a: &PageSequence,
        b: &PageSequence,
        cancel: &AtomicBool,
    ) -> Result<Comparison, PageDiffError> {
        let plan =
            AlignmentPlanner::new(&self.config, &self.scorer).plan_with_cancel(a, b, cancel)?;

        let mut pairs = Vec::with_capacity(plan.len());
        for pair in self.pair_diffs(a, b, &plan) {
            pairs.push(pair);
            if cancel.load(Ordering::Relaxed) {
                return Err(PageDiffError::Cancelled {
                    records: plan.len(),
                });
            }
        }

        Ok(self.finish(a, b, plan, pairs))
    }

    /// Lazily diff every MATCHED pair of `plan`
    fn pair_diffs<'r>(
        &self,
        a: &'r PageSequence,
        b: &'r PageSequence,
        plan: &'r AlignmentPlan,
    ) -> impl Iterator<Item = PairDiff> + 'r {
        let differ = PageDiffer::new(&self.config);
        plan.matched_pairs()
            .map(move |(source_index, target_index, similarity)| {
                let source = a.get(source_index).map_or("", |p| p.text.as_str());
                let target = b.get(target_index).map_or("", |p| p.text.as_str());
                PairDiff {
                    source_index,
                    target_index,
                    similarity,
                    spans: differ.diff(source, target),
                }
            })
    }

    fn finish(
        &self,
        a: &PageSequence,
        b: &PageSequence,
        plan: AlignmentPlan,
        pairs: Vec<PairDiff>,
    ) -> Comparison {
        let summary = ComparisonSummary::new(a.len(), b.len(), &plan, &pairs);
        debug!(
            matched = summary.matched,
            inserted = summary.inserted,
            deleted = summary.deleted,
            changed_pairs = summary.changed_pairs,
            "Comparison finished"
        );

        Comparison {
            plan,
            pairs,
            summary,
        }
    }

    /// Unified diff of the documents' joined text with the default labels
    pub fn unified_diff(&self, a: &PageSequence, b: &PageSequence, context: usize) -> Vec<String> {
        unified_document_diff(a, b, DEFAULT_FROM_LABEL, DEFAULT_TO_LABEL, context)
    }
}
