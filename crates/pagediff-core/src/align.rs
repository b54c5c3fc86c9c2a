//! Page alignment planner
//!
//! Walks two cursors over the page sequences and decides, at each step,
//! whether the current pages correspond or whether pages were inserted into
//! B or deleted from A.
//!
//! Per step, with `base = score(A[i], B[j])`:
//! 1. Insertion lookahead: probe `A[i]` against `B[j+1..=j+W]`.
//! 2. Deletion lookahead: probe `A[i+1..=i+W]` against `B[j]`.
//! 3. Otherwise MATCHED, however low `base` is.
//!
//! A probe qualifies when it beats `base + insertion_margin` and the
//! acceptance threshold. Insertion is tried first, so it wins when both sides
//! would fire. After a jump the step restarts at the new cursor pair.
//!
//! When neither window fires and both the current pair and the next diagonal
//! pair are below the threshold, the windows slide forward by `W` and are
//! probed again, up to `max_window_extensions` times. A jump found that way
//! must be confirmed by the pair that follows the landing pair.

use crate::config::EngineConfig;
use crate::error::PageDiffError;
use crate::page::{PageContent, PageSequence};
use crate::similarity::SimilarityScorer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentKind {
    /// Page present in both documents
    Matched,
    /// Page present only in document B
    Inserted,
    /// Page present only in document A
    Deleted,
}

/// One entry of the alignment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub kind: AlignmentKind,
    /// Page index in document A
    pub source_index: Option<usize>,
    /// Page index in document B
    pub target_index: Option<usize>,
    /// Score that justified a MATCHED pairing
    pub similarity: Option<f64>,
}

impl AlignmentRecord {
    pub fn matched(source_index: usize, target_index: usize, similarity: f64) -> Self {
        Self {
            kind: AlignmentKind::Matched,
            source_index: Some(source_index),
            target_index: Some(target_index),
            similarity: Some(similarity),
        }
    }

    pub fn inserted(target_index: usize) -> Self {
        Self {
            kind: AlignmentKind::Inserted,
            source_index: None,
            target_index: Some(target_index),
            similarity: None,
        }
    }

    pub fn deleted(source_index: usize) -> Self {
        Self {
            kind: AlignmentKind::Deleted,
            source_index: Some(source_index),
            target_index: None,
            similarity: None,
        }
    }

    /// Matched pages sitting at different positions in the two documents
    pub fn is_shifted(&self) -> bool {
        match (self.kind, self.source_index, self.target_index) {
            (AlignmentKind::Matched, Some(s), Some(t)) => s != t,
            _ => false,
        }
    }

    /// `(source, target, similarity)` for MATCHED records
    pub fn as_pair(&self) -> Option<(usize, usize, f64)> {
        match (self.kind, self.source_index, self.target_index) {
            (AlignmentKind::Matched, Some(s), Some(t)) => {
                Some((s, t, self.similarity.unwrap_or(0.0)))
            }
            _ => None,
        }
    }
}

/// Ordered alignment covering every page of both documents exactly once
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentPlan {
    records: Vec<AlignmentRecord>,
}

impl AlignmentPlan {
    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignmentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, kind: AlignmentKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    pub fn shifted_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_shifted()).count()
    }

    /// `(source, target, similarity)` of every MATCHED record, in order
    pub fn matched_pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.records.iter().filter_map(AlignmentRecord::as_pair)
    }

    pub fn into_records(self) -> Vec<AlignmentRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a AlignmentPlan {
    type Item = &'a AlignmentRecord;
    type IntoIter = std::slice::Iter<'a, AlignmentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Skip pages of B
    Insertion,
    /// Skip pages of A
    Deletion,
}

#[derive(Debug, Clone, Copy)]
struct Jump {
    side: Side,
    pages: usize,
    score: f64,
    extended: bool,
}

/// Per-run score cache keyed by page indices
///
/// Within one run an index pair always refers to the same two immutable
/// texts, so the cache can never leak across comparisons.
struct ScoreMemo<'p, S: ?Sized> {
    scorer: &'p S,
    a: &'p [PageContent],
    b: &'p [PageContent],
    cache: HashMap<(usize, usize), f64>,
}

impl<'p, S: SimilarityScorer + ?Sized> ScoreMemo<'p, S> {
    fn new(scorer: &'p S, a: &'p [PageContent], b: &'p [PageContent]) -> Self {
        Self {
            scorer,
            a,
            b,
            cache: HashMap::new(),
        }
    }

    fn score(&mut self, i: usize, j: usize) -> f64 {
        if let Some(&score) = self.cache.get(&(i, j)) {
            return score;
        }
        let score = self.scorer.score(&self.a[i].text, &self.b[j].text);
        self.cache.insert((i, j), score);
        score
    }

    /// Whether `score(i, j)` could exceed `bar`
    fn may_exceed(&self, i: usize, j: usize, bar: f64) -> bool {
        if let Some(&score) = self.cache.get(&(i, j)) {
            return score > bar;
        }
        self.scorer.upper_bound(&self.a[i].text, &self.b[j].text) > bar
    }
}

pub struct AlignmentPlanner<'e, S: ?Sized> {
    config: &'e EngineConfig,
    scorer: &'e S,
}

impl<'e, S: SimilarityScorer + ?Sized> AlignmentPlanner<'e, S> {
    pub fn new(config: &'e EngineConfig, scorer: &'e S) -> Self {
        Self { config, scorer }
    }

    /// Align two page sequences
    pub fn plan(&self, a: &PageSequence, b: &PageSequence) -> AlignmentPlan {
        let never = AtomicBool::new(false);
        self.plan_with_cancel(a, b, &never).unwrap_or_default()
    }

    /// Align two page sequences, checking `cancel` between steps
    ///
    /// # Errors
    ///
    /// Returns `PageDiffError::Cancelled` once `cancel` is observed set.
    pub fn plan_with_cancel(
        &self,
        a: &PageSequence,
        b: &PageSequence,
        cancel: &AtomicBool,
    ) -> Result<AlignmentPlan, PageDiffError> {
        let (m, n) = (a.len(), b.len());
        let mut memo = ScoreMemo::new(self.scorer, a.pages(), b.pages());
        let mut records = Vec::with_capacity(m.max(n));
        let (mut i, mut j) = (0, 0);

        while i < m || j < n {
            if cancel.load(Ordering::Relaxed) {
                return Err(PageDiffError::Cancelled {
                    records: records.len(),
                });
            }

            if i >= m {
                records.push(AlignmentRecord::inserted(j));
                j += 1;
                continue;
            }
            if j >= n {
                records.push(AlignmentRecord::deleted(i));
                i += 1;
                continue;
            }

            let base = memo.score(i, j);

            if let Some(jump) = self.find_jump(&mut memo, i, j, base) {
                let (landing_i, landing_j) = match jump.side {
                    Side::Insertion => (i, j + jump.pages),
                    Side::Deletion => (i + jump.pages, j),
                };

                // Guard: the realigned pair has to stand on its own
                if memo.score(landing_i, landing_j) > self.config.acceptance_threshold {
                    tracing::debug!(
                        "{:?} of {} page(s) at ({}, {}) (base {:.3}, landing {:.3}, extended: {})",
                        jump.side,
                        jump.pages,
                        i,
                        j,
                        base,
                        jump.score,
                        jump.extended
                    );
                    match jump.side {
                        Side::Insertion => {
                            records.extend((j..landing_j).map(AlignmentRecord::inserted));
                            j = landing_j;
                        }
                        Side::Deletion => {
                            records.extend((i..landing_i).map(AlignmentRecord::deleted));
                            i = landing_i;
                        }
                    }
                    continue;
                }

                tracing::debug!(
                    "Rolled back {:?} at ({}, {}): landing pair below threshold",
                    jump.side,
                    i,
                    j
                );
            }

            records.push(AlignmentRecord::matched(i, j, base));
            i += 1;
            j += 1;
        }

        let plan = AlignmentPlan { records };
        tracing::debug!(
            "Aligned {} x {} pages: {} matched, {} inserted, {} deleted",
            m,
            n,
            plan.count(AlignmentKind::Matched),
            plan.count(AlignmentKind::Inserted),
            plan.count(AlignmentKind::Deleted)
        );
        Ok(plan)
    }

    fn find_jump(
        &self,
        memo: &mut ScoreMemo<'_, S>,
        i: usize,
        j: usize,
        base: f64,
    ) -> Option<Jump> {
        let window = self.config.lookahead_window;
        let threshold = self.config.acceptance_threshold;
        let bar = (base + self.config.insertion_margin).max(threshold);

        for side in [Side::Insertion, Side::Deletion] {
            let offsets = 1..window.saturating_add(1);
            if let Some(jump) = self.probe(memo, side, i, j, offsets, bar, false) {
                return Some(jump);
            }
        }

        // An edited page followed by a matching one is a rewrite, not a run
        if window == 0 || base > threshold || self.diagonal_holds(memo, i, j) {
            return None;
        }

        let (m, n) = (memo.a.len(), memo.b.len());
        let mut start = window.saturating_add(1);
        let mut extensions = 0;

        loop {
            if self
                .config
                .max_window_extensions
                .is_some_and(|limit| extensions >= limit)
            {
                return None;
            }

            let insertion_open = j.saturating_add(start) < n;
            let deletion_open = i.saturating_add(start) < m;
            if !insertion_open && !deletion_open {
                return None;
            }

            let offsets = start..start.saturating_add(window);
            let sides = [
                (Side::Insertion, insertion_open),
                (Side::Deletion, deletion_open),
            ];
            for (side, open) in sides {
                if !open {
                    continue;
                }
                if let Some(jump) = self.probe(memo, side, i, j, offsets.clone(), bar, true) {
                    return Some(jump);
                }
            }

            start = start.saturating_add(window);
            extensions += 1;
        }
    }

    fn diagonal_holds(&self, memo: &mut ScoreMemo<'_, S>, i: usize, j: usize) -> bool {
        let (next_i, next_j) = (i + 1, j + 1);
        next_i < memo.a.len()
            && next_j < memo.b.len()
            && memo.score(next_i, next_j) > self.config.acceptance_threshold
    }

    /// Best qualifying probe over `offsets`; ties go to the smallest offset
    #[allow(clippy::too_many_arguments)]
    fn probe(
        &self,
        memo: &mut ScoreMemo<'_, S>,
        side: Side,
        i: usize,
        j: usize,
        offsets: Range<usize>,
        bar: f64,
        confirm: bool,
    ) -> Option<Jump> {
        let (m, n) = (memo.a.len(), memo.b.len());
        let mut best: Option<Jump> = None;

        for k in offsets {
            let (pi, pj) = match side {
                Side::Insertion => (i, j.saturating_add(k)),
                Side::Deletion => (i.saturating_add(k), j),
            };
            if pi >= m || pj >= n {
                break;
            }
            if !memo.may_exceed(pi, pj, bar) {
                continue;
            }

            let score = memo.score(pi, pj);
            if score <= bar || best.is_some_and(|b| score <= b.score) {
                continue;
            }
            if confirm && !self.confirmed(memo, pi, pj) {
                continue;
            }

            best = Some(Jump {
                side,
                pages: k,
                score,
                extended: confirm,
            });
        }

        best
    }

    /// The pair after `(i, j)` also matches, or both documents end there
    fn confirmed(&self, memo: &mut ScoreMemo<'_, S>, i: usize, j: usize) -> bool {
        let (next_i, next_j) = (i + 1, j + 1);
        let (m, n) = (memo.a.len(), memo.b.len());

        if next_i == m && next_j == n {
            return true;
        }
        if next_i >= m || next_j >= n {
            return false;
        }
        memo.score(next_i, next_j) > self.config.acceptance_threshold
    }
}
